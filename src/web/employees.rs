//! Employee directory routes: the phone directory under each query strategy,
//! plus pages that walk the department, employee and project relationships.

use super::AppState;
use crate::db::employees as repo;
use crate::error::{AppError, AppResult};
use crate::model::PhoneDirStrategy;
use crate::templates::render;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tera::Context;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/phones", get(phones))
        .route("/departments/{code}", get(show_department))
        .route("/employees/{id}", get(show_employee))
        .route("/projects/{code}", get(show_project))
}

#[derive(Debug, Deserialize)]
pub struct PhonesQuery {
    pub strategy: Option<String>,
}

/// GET / - Phone directory via outer join, so nobody is left out
async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_directory(&state, PhoneDirStrategy::OuterJoin).await
}

/// GET /phones?strategy=... - Phone directory under a chosen strategy
async fn phones(
    State(state): State<AppState>,
    Query(query): Query<PhonesQuery>,
) -> AppResult<Html<String>> {
    let strategy = match query.strategy.as_deref() {
        None => PhoneDirStrategy::OuterJoin,
        Some(raw) => raw.parse().map_err(AppError::BadRequest)?,
    };
    render_directory(&state, strategy).await
}

async fn render_directory(state: &AppState, strategy: PhoneDirStrategy) -> AppResult<Html<String>> {
    let directory = repo::phone_directory(state.pool(), strategy).await?;
    let mut ctx = Context::new();
    ctx.insert("directory", &directory);
    ctx.insert("strategies", &PhoneDirStrategy::ALL);
    render(state.templates(), "employees/phones.html", &ctx)
}

/// GET /departments/{code} - Department and its employees
async fn show_department(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Html<String>> {
    let dept = repo::get_department(state.pool(), &code)
        .await?
        .ok_or_else(|| AppError::not_found("Department", &code))?;
    let employees = repo::department_employees(state.pool(), &code).await?;

    let mut ctx = Context::new();
    ctx.insert("dept", &dept);
    ctx.insert("employees", &employees);
    render(state.templates(), "employees/department.html", &ctx)
}

/// GET /employees/{id} - Employee, their department and project assignments
async fn show_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let emp_id: i64 = id.parse().map_err(|_| AppError::not_found("Employee", &id))?;
    let emp = repo::get_employee(state.pool(), emp_id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", emp_id))?;
    let dept = match emp.dept_code.as_deref() {
        Some(code) => repo::get_department(state.pool(), code).await?,
        None => None,
    };
    let assignments = repo::employee_assignments(state.pool(), emp_id).await?;

    let mut ctx = Context::new();
    ctx.insert("emp", &emp);
    ctx.insert("dept", &dept);
    ctx.insert("assignments", &assignments);
    render(state.templates(), "employees/employee.html", &ctx)
}

/// GET /projects/{code} - Project and the employees on it
async fn show_project(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Html<String>> {
    let project = repo::get_project(state.pool(), &code)
        .await?
        .ok_or_else(|| AppError::not_found("Project", &code))?;
    let members = repo::project_members(state.pool(), &code).await?;

    let mut ctx = Context::new();
    ctx.insert("project", &project);
    ctx.insert("members", &members);
    render(state.templates(), "employees/project.html", &ctx)
}
