//! HTTP-facing error type. Handlers return [`AppResult`]; every variant maps
//! to a status code and an HTML error page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Turn unique-constraint violations into [`AppError::Conflict`].
    pub fn from_insert(err: sqlx::Error, what: &str) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("{} already exists", what))
            }
            _ => AppError::Database(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Underlying error text of a 5xx response, attached as a response extension.
/// The debug layer in `web` surfaces it; otherwise it never leaves the process.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if !status.is_server_error() {
            return (status, Html(error_page(status, &self.to_string(), None))).into_response();
        }

        tracing::error!(error = %self, "request failed");
        let mut response =
            (status, Html(error_page(status, INTERNAL_MESSAGE, None))).into_response();
        response
            .extensions_mut()
            .insert(ErrorDetail(self.to_string()));
        response
    }
}

pub(crate) const INTERNAL_MESSAGE: &str = "an internal error occurred";

/// Minimal standalone page; it must not depend on the template set, which may
/// be the thing that failed.
pub(crate) fn error_page(status: StatusCode, message: &str, detail: Option<&str>) -> String {
    let detail = detail
        .map(|d| format!("<pre>{}</pre>", escape(d)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html><head><title>{code}</title></head>\
         <body><h1>{code} {reason}</h1><p>{msg}</p>{detail}</body></html>\n",
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or(""),
        msg = escape(message),
        detail = detail,
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::not_found("Pet", 7).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message() {
        assert_eq!(AppError::not_found("Pet", 7).to_string(), "Pet '7' not found");
    }

    #[test]
    fn error_page_escapes() {
        let page = error_page(StatusCode::BAD_REQUEST, "<b>nope</b>", None);
        assert!(page.contains("400 Bad Request"));
        assert!(page.contains("&lt;b&gt;nope&lt;/b&gt;"));
    }

    #[test]
    fn server_errors_hide_detail_but_carry_it() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert!(detail.0.contains("Database error"));

        let response = AppError::not_found("Pet", 1).into_response();
        assert!(response.extensions().get::<ErrorDetail>().is_none());
    }
}
