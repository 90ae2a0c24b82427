//! Domain error types for the homeroom report server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::services::renderer::RenderError;
use crate::store::StoreError;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record store (spreadsheet) operation failed
    #[error("Store error: {0}")]
    Store(StoreError),

    /// External upload endpoint failed
    #[error("Upload error: {0}")]
    Upload(String),

    /// PDF rendering failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
            AppError::Store(err) => {
                tracing::error!("Store error: {}", err);
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "STORE_ERROR",
                    "The record store could not complete the request".to_string(),
                )
            }
            AppError::Upload(err_str) => {
                tracing::error!("Upload error: {}", err_str);
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "UPLOAD_ERROR",
                    "File upload failed".to_string(),
                )
            }
            AppError::Render(err) => {
                tracing::error!("PDF generation failed: {}", err);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "Failed to generate PDF".to_string(),
                )
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RowNotFound(what) => AppError::NotFound(what),
            other => AppError::Store(other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}
