//! JSON extractor that tolerates unparseable bodies.

use axum::{
    extract::{FromRequest, Json, Request, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON body extractor that falls back to `T::default()`.
///
/// A malformed body or a body of the wrong shape yields the default value,
/// leaving it to the handler's own validation to report what is missing.
/// Requests without a JSON content type are still rejected with 415.
///
/// ```ignore
/// async fn create(LenientJson(input): LenientJson<ProfileInput>) -> Response {
///     // `input` is empty when the body could not be parsed
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(data)) => Ok(LenientJson(data)),
            Err(rejection @ JsonRejection::MissingJsonContentType(_)) => {
                Err(rejection.into_response())
            }
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Unparseable JSON body, using empty input");
                Ok(LenientJson(T::default()))
            }
        }
    }
}
