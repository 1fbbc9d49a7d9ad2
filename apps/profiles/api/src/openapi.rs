use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Profiles API",
        version = "0.1.0",
        description = "Register, list and update user profiles"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/users", api = domain_profiles::ApiDoc)
    )
)]
pub struct ApiDoc;
