//! Service configuration
//!
//! Values come from `DIET_*` environment variables layered over defaults.
//! Database settings live in [`common::database::DatabaseConfig`].

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Which repository implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_address: String,
    /// `tracing` filter directive, e.g. `info` or `diet_api=debug`
    pub log_level: String,
    /// Lifetime of the session cookie, in days
    pub session_ttl_days: i64,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
    pub storage: StorageBackend,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// # Environment Variables
    /// - `DIET_BIND_ADDRESS` (default: "0.0.0.0:3333")
    /// - `DIET_LOG_LEVEL` (default: "info")
    /// - `DIET_SESSION_TTL_DAYS` (default: 7)
    /// - `DIET_RUN_MIGRATIONS` (default: true)
    /// - `DIET_STORAGE`: "postgres" or "memory" (default: "postgres")
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .set_default("bind_address", "0.0.0.0:3333")?
            .set_default("log_level", "info")?
            .set_default("session_ttl_days", 7)?
            .set_default("run_migrations", true)?
            .set_default("storage", "postgres")?
            .add_source(Environment::with_prefix("DIET").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.session_ttl_days <= 0 {
            return Err(ConfigError::Message(format!(
                "DIET_SESSION_TTL_DAYS must be positive, got {}",
                config.session_ttl_days
            )));
        }

        Ok(config)
    }
}
