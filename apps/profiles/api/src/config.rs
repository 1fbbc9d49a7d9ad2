use core_config::{AppInfo, FromEnv, app_info, env_optional, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// `None` runs the service on the in-memory store
    pub database: Option<PostgresConfig>,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let database = match env_optional("DATABASE_URL") {
            Some(_) => Some(PostgresConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
        })
    }
}
