//! Error types for Bookshelf

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use validator::ValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (status, Html(not_found_page())).into_response()
            }
            AppError::Validation(errors) => {
                tracing::warn!("Unhandled validation error: {}", errors);
                (status, self.to_string()).into_response()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (status, self.to_string()).into_response()
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                (status, self.to_string()).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (status, self.to_string()).into_response()
            }
        }
    }
}

fn not_found_page() -> &'static str {
    r#"<!DOCTYPE html>
<html>
  <head><title>Page Not Found</title></head>
  <body>
    <h1>Page Not Found</h1>
    <p>Sorry! We couldn't find the page you were looking for.</p>
    <p><a href="/books">Back to the catalog</a></p>
  </body>
</html>
"#
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
