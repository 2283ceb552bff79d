//! Application configuration module
//!
//! This module provides type-safe configuration loading using the `config`
//! and `dotenvy` crates. Values come from (later sources win):
//!
//! 1. Built-in defaults
//! 2. An optional TOML file named by `ORDER_EVENTS_CONFIG`
//! 3. Environment variables with the `ORDER_EVENTS` prefix, `__` separated
//!
//! # Example
//!
//! ```no_run
//! use order_events::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod dispatch;
mod error;
mod orders;
mod server;

pub use dispatch::{DispatchConfig, MAX_QUEUE_CAPACITY, MAX_WORKER_POOL_SIZE};
pub use error::{ConfigError, ValidationError};
pub use orders::OrdersConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;
use std::path::Path;

/// Environment variable naming an optional configuration file.
pub const CONFIG_FILE_ENV: &str = "ORDER_EVENTS_CONFIG";

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "ORDER_EVENTS";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Event dispatch configuration (worker pool, queue, timeout)
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Order listener configuration (threshold, simulated latencies)
    #[serde(default)]
    pub orders: OrdersConfig,
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads the file named by `ORDER_EVENTS_CONFIG`, if set
    /// 3. Reads environment variables with `ORDER_EVENTS` prefix
    /// 4. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `ORDER_EVENTS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ORDER_EVENTS__DISPATCH__WORKER_POOL_SIZE=8` -> `dispatch.worker_pool_size = 8`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or malformed, or if
    /// values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        match std::env::var_os(CONFIG_FILE_ENV) {
            Some(path) => Self::load_from(Some(Path::new(&path))),
            None => Self::load_from(None),
        }
    }

    /// Load configuration from an explicit file plus the environment
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.dispatch.validate()?;
        self.orders.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
