use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{self, DatabaseConnection};
use domain_profiles::{
    InMemoryProfileRepository, PgProfileRepository, ProfileRepository, ProfileService,
};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    match config.database.clone() {
        Some(database) => {
            let db = postgres::connect_from_config_with_retry(database, None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

            postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
                .await
                .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

            let repository = PgProfileRepository::new(db.clone());
            serve(config, repository, Some(db)).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, profiles are kept in memory only");
            serve(config, InMemoryProfileRepository::new(), None).await
        }
    }
}

async fn serve<R: ProfileRepository + 'static>(
    config: Config,
    repository: R,
    db: Option<DatabaseConnection>,
) -> eyre::Result<()> {
    let service = ProfileService::new(repository);

    // Pages, /health and /ready live at the root, next to the documented /api
    let root_routes = api::page_routes(&service)?
        .merge(health_router(config.app))
        .merge(api::ready_router(service.clone()));

    let router = axum_helpers::create_router::<openapi::ApiDoc>(
        api::routes(&service),
        root_routes,
        &config.server,
    )?;

    info!("Starting {} v{} (30s shutdown timeout)", config.app.name, config.app.version);

    create_production_app(
        router,
        &config.server,
        Duration::from_secs(30),
        async move {
            if let Some(db) = db {
                info!("Shutting down: closing database connections");
                match db.close().await {
                    Ok(_) => info!("PostgreSQL connection closed successfully"),
                    Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                }
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Profiles API shutdown complete");
    Ok(())
}
