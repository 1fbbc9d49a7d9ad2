//! Readiness check against the profile store.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_profiles::{ProfileRepository, ProfileService};

/// Readiness check endpoint that round-trips to the store.
///
/// The in-memory store always answers; PostgreSQL runs `SELECT 1`.
pub async fn ready_handler<R: ProfileRepository>(
    State(service): State<ProfileService<R>>,
) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            service
                .ping()
                .await
                .map_err(|e| format!("Store ping failed: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use domain_profiles::InMemoryProfileRepository;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ready_with_memory_store() {
        let service = ProfileService::new(InMemoryProfileRepository::new());
        let response = crate::api::ready_router(service)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
