use super::shutdown::{ShutdownCoordinator, coordinated_shutdown};
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Assembles the full router with documentation and cross-cutting middleware.
///
/// - `apis` is nested under `/api` and documented by `T`
/// - `root_routes` (HTML pages, health probes) are merged at `/`
/// - Swagger UI at `/swagger-ui`, spec at `/api-docs/openapi.json`
/// - JSON 404 fallback, request tracing, security headers, compression
/// - CORS only when `server_config.cors_allowed_origin` is set
///
/// Both routers must already have their state applied.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is set but holds no valid origin.
///
/// ```ignore
/// let router = create_router::<ApiDoc>(api_routes, page_routes, &config.server)?;
/// ```
pub fn create_router<T>(
    apis: Router,
    root_routes: Router,
    server_config: &ServerConfig,
) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .nest("/api", apis)
        .merge(root_routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    let router = match server_config.cors_allowed_origin.as_deref() {
        Some(origins) => {
            info!("CORS configured with allowed origins: {}", origins);
            router.layer(create_cors_layer(origins)?)
        }
        None => router,
    };

    Ok(router.layer(CompressionLayer::new()))
}

/// Serves `router` and runs `cleanup` once a shutdown signal arrives.
///
/// `cleanup` is bounded by `shutdown_timeout`; when it overruns, the process
/// moves on without waiting for it.
///
/// ```ignore
/// let cleanup = async move {
///     db.close().await.ok();
/// };
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        if shutdown_rx.recv().await.is_err() {
            return;
        }

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator))
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}
