//! Application configuration schemas.
//!
//! Configuration is assembled by the `config` crate from, in increasing
//! priority: serde defaults, optional TOML files, `AUTHGATE_*` environment
//! variables, and the plain variables the service has always honoured
//! (`JWT_ACCESS_SECRET`, `DATABASE_URL`, ...).

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, parse_duration};
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Plain environment variables mapped onto configuration keys.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("JWT_ACCESS_SECRET", "auth.access_secret"),
    ("JWT_REFRESH_SECRET", "auth.refresh_secret"),
    ("JWT_ACCESS_EXPIRE", "auth.access_expire"),
    ("JWT_REFRESH_EXPIRE", "auth.refresh_expire"),
    ("DATABASE_URL", "database.url"),
    ("PORT", "server.port"),
];

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name from the process
    /// environment and the `config/` directory, then validate it.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_with(env, |key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve the plain environment
    /// aliases, then validate it.
    pub fn load_with<F>(env: &str, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("AUTHGATE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in ENV_ALIASES {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        let config: Self = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that must hold before the server starts.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()
    }
}
