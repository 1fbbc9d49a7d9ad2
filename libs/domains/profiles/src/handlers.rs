use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{ErrorResponse, IdPath, LenientJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProfileResult;
use crate::models::{ApiErrorBody, ProfileInput, User, WriteResponse};
use crate::repository::ProfileRepository;
use crate::service::ProfileService;

const TAG: &str = "users";

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user),
    components(schemas(User, ProfileInput, WriteResponse, ApiErrorBody)),
    tags(
        (name = TAG, description = "User profile endpoints")
    )
)]
pub struct ApiDoc;

/// JSON API router, meant to be nested under `/users`
pub fn router<R: ProfileRepository + 'static>(service: ProfileService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", put(update_user))
        .with_state(shared_service)
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All users in id order", body = Vec<User>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn list_users<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
) -> ProfileResult<Json<Vec<User>>> {
    let users = service.list_profiles().await?;
    Ok(Json(users))
}

/// Create a user
///
/// An unparseable JSON body is treated as an empty object; a body without a
/// JSON content type is rejected with 415.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = ProfileInput,
    responses(
        (status = 201, description = "User created", body = WriteResponse),
        (status = 400, description = "Invalid field or email already registered", body = ApiErrorBody),
        (status = 415, description = "Content type is not application/json"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn create_user<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
    LenientJson(input): LenientJson<ProfileInput>,
) -> ProfileResult<impl IntoResponse> {
    let user = service.create_profile(input).await?;
    Ok((StatusCode::CREATED, Json(WriteResponse::created(user.id))))
}

/// Replace every field of a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = ProfileInput,
    responses(
        (status = 200, description = "User updated", body = WriteResponse),
        (status = 400, description = "Invalid field or email owned by another user", body = ApiErrorBody),
        (status = 404, description = "No user with this id", body = ErrorResponse),
        (status = 415, description = "Content type is not application/json"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn update_user<R: ProfileRepository>(
    State(service): State<Arc<ProfileService<R>>>,
    IdPath(id): IdPath,
    LenientJson(input): LenientJson<ProfileInput>,
) -> ProfileResult<Json<WriteResponse>> {
    let user = service.update_profile(id, input).await?;
    Ok(Json(WriteResponse::updated(user.id)))
}
