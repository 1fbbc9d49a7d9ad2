use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, ErrorCode};
use std::fmt;
use thiserror::Error;

use crate::models::ApiErrorBody;
use crate::validation::ValidationErrors;

/// Which write found the email already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteOp::Create => "create",
            WriteOp::Update => "update",
        })
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Email '{email}' already registered ({op})")]
    DuplicateEmail { email: String, op: WriteOp },

    #[error("User not found: {0}")]
    NotFound(i32),

    /// Raised by a store when a write would break the unique email index
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProfileResult<T> = Result<T, ProfileError>;

impl ProfileError {
    /// Body for a 400 response, `None` for errors answered some other way.
    pub fn api_error_body(&self) -> Option<ApiErrorBody> {
        match self {
            ProfileError::Validation(errors) => errors.first().map(|first| ApiErrorBody {
                error: first.api_error().to_string(),
                message: first.detail.clone(),
            }),
            ProfileError::DuplicateEmail { op, .. } => Some(ApiErrorBody {
                error: duplicate_message(*op).to_string(),
                message: None,
            }),
            ProfileError::ConstraintViolation(_) => Some(ApiErrorBody {
                error: duplicate_message(WriteOp::Create).to_string(),
                message: None,
            }),
            ProfileError::NotFound(_) | ProfileError::Internal(_) => None,
        }
    }
}

fn duplicate_message(op: WriteOp) -> &'static str {
    match op {
        WriteOp::Create => "email already registered",
        WriteOp::Update => "email already registered by another user",
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        if let Some(body) = self.api_error_body() {
            let error_code = match &self {
                ProfileError::Validation(_) => ErrorCode::ValidationError,
                _ => ErrorCode::Conflict,
            };
            tracing::info!(error_code = error_code.code(), error = %self, "Rejected profile write");
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }

        let app_error = match self {
            ProfileError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            other => AppError::InternalServerError(other.to_string()),
        };
        app_error.into_response()
    }
}
