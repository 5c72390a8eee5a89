//! Intro demo: a single page proving the app is wired to its database.

use super::AppState;
use crate::error::AppResult;
use crate::templates::render;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tera::Context;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(home_page))
}

/// GET / - Home page
async fn home_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    sqlx::query("SELECT 1").execute(state.pool()).await?;
    let mut ctx = Context::new();
    ctx.insert("database", state.database());
    render(state.templates(), "intro/home.html", &ctx)
}
