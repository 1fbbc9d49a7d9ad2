//! Integer path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Extractor for integer id path parameters.
///
/// A segment that does not parse as `i32` cannot name any record, so it is
/// rejected as 404 rather than 400.
///
/// ```ignore
/// use axum::routing::put;
/// use axum_helpers::extractors::IdPath;
///
/// async fn update(IdPath(id): IdPath) -> String {
///     format!("user {}", id)
/// }
///
/// let app = Router::new().route("/users/{id}", put(update));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.parse::<i32>()
            .map(IdPath)
            .map_err(|_| AppError::NotFound(format!("No record with id '{}'", raw)).into_response())
    }
}
