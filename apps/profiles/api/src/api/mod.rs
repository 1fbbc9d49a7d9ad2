use axum::Router;
use domain_profiles::{ProfileRepository, ProfileService, handlers, pages};

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes<R: ProfileRepository + 'static>(service: &ProfileService<R>) -> Router {
    Router::new().nest("/users", handlers::router(service.clone()))
}

/// HTML pages served from the site root
pub fn page_routes<R: ProfileRepository + 'static>(
    service: &ProfileService<R>,
) -> eyre::Result<Router> {
    pages::router(service.clone())
        .map_err(|e| eyre::eyre!("Failed to register page templates: {}", e))
}

/// Creates a router with the /ready endpoint that checks the profile store.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router<R: ProfileRepository + 'static>(service: ProfileService<R>) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler::<R>))
        .with_state(service)
}
