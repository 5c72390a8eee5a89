//! HTTP surface: one axum router per demo, sharing state and middleware.

pub mod employees;
pub mod intro;
pub mod pets;

use crate::config::Config;
use crate::db::Pool;
use crate::error::{error_page, ErrorDetail, INTERNAL_MESSAGE};
use crate::model::Demo;
use crate::templates;
use anyhow::Result;
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use std::sync::Arc;
use tera::Tera;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: Pool,
    templates: Tera,
    database: String,
}

impl AppState {
    /// Compiles the template set; fails if any template is malformed.
    pub fn new(pool: Pool, database: impl Into<String>) -> Result<Self, tera::Error> {
        Ok(Self {
            inner: Arc::new(AppStateInner {
                pool,
                templates: templates::load()?,
                database: database.into(),
            }),
        })
    }

    pub fn pool(&self) -> &Pool {
        &self.inner.pool
    }

    pub fn templates(&self) -> &Tera {
        &self.inner.templates
    }

    /// Name of the database file backing this demo.
    pub fn database(&self) -> &str {
        &self.inner.database
    }
}

/// Build the router for one demo. With `debug` on, 500 pages include the
/// underlying error.
pub fn router(demo: Demo, state: AppState, debug: bool) -> Router {
    let routes = match demo {
        Demo::Intro => intro::routes(),
        Demo::Pets => pets::routes(),
        Demo::Employees => employees::routes(),
    };
    let mut app = routes.with_state(state);
    if debug {
        app = app.layer(middleware::map_response(show_error_detail));
    }
    app.layer(TraceLayer::new_for_http())
}

async fn show_error_detail(response: Response) -> Response {
    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };
    let status = response.status();
    (status, Html(error_page(status, INTERNAL_MESSAGE, Some(&detail)))).into_response()
}

/// Serve a demo until Ctrl-C.
pub async fn serve(demo: Demo, cfg: &Config, pool: Pool) -> Result<()> {
    let state = AppState::new(pool, demo.database_file())?;
    let app = router(demo, state, cfg.server.debug);

    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%demo, %addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
}
