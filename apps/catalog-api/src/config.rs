use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_catalog::{ImageSearchConfig, ImageStorageConfig};

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components with the catalog's image settings
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub images: ImageStorageConfig,
    pub image_search: ImageSearchConfig,
    /// Apply pending migrations before serving (RUN_MIGRATIONS, default true)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?;
        let images = ImageStorageConfig::from_env()?;
        let image_search = ImageSearchConfig::from_env()?;
        let run_migrations = env_parse("RUN_MIGRATIONS", true)?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            images,
            image_search,
            run_migrations,
        })
    }
}
