pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Error body for framework-level failures.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "not found",
///   "message": "The requested resource was not found"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Short lowercase error label
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

/// Framework-level errors converted straight into [`ErrorResponse`] bodies.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (ErrorCode::NotFound, msg)
            }
            AppError::InternalServerError(msg) => {
                // Logged in full, never returned to the client
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal error: {}", msg);
                (
                    ErrorCode::InternalError,
                    ErrorCode::InternalError.default_message().to_string(),
                )
            }
        };

        error_response(status, message, code)
    }
}

/// Human-readable label used as the `error` field.
pub fn error_label(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::ValidationError => "bad request",
        ErrorCode::NotFound => "not found",
        ErrorCode::Conflict => "conflict",
        ErrorCode::InternalError => "internal error",
    }
}

/// Build an [`ErrorResponse`] with the given status.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = ErrorResponse {
        code: error_code.code(),
        error: error_label(error_code).to_string(),
        message,
    };

    (status, Json(body)).into_response()
}
