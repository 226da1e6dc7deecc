/// Error types for blog-service
///
/// Handlers recover NotFound and validation failures locally; anything that
/// reaches `ResponseError` is rendered as one of the two fixed error pages.
/// Internal detail is logged, never shown to the user.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

use crate::templates;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Template rendering failed
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Requested group/user/post does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed request body (multipart framing, oversized upload)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match status {
            StatusCode::NOT_FOUND => templates::not_found_page(None),
            StatusCode::BAD_REQUEST => {
                tracing::warn!(error = %self, "bad request");
                HttpResponse::BadRequest()
                    .content_type(mime::TEXT_PLAIN_UTF_8)
                    .body("Bad request")
            }
            _ => {
                tracing::error!(error = %self, "request failed");
                templates::server_error_page()
            }
        }
    }
}
