use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Listen port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Art Vault server.
#[derive(Debug)]
pub struct Config {
    /// MongoDB connection string; the document store stays offline when unset.
    pub database_url: Option<String>,
    /// Name of the MongoDB database holding the catalog collections.
    pub database_name: Option<String>,
    /// Port the HTTP server listens on.
    pub server_port: u16,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: load_env_optional("DATABASE_URL"),
            database_name: load_env_optional("DATABASE_NAME"),
            server_port: load_env_optional("PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("PORT".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_PORT),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        database_configured = config.database_url.is_some(),
        database_name = ?config.database_name,
        server_port = config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
