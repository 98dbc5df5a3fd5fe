//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEDBOOK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use medbook_client::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.api.base_url);
//! ```

mod api;
mod error;
mod storage;

pub use api::{ApiConfig, Environment, DEFAULT_BASE_URL};
pub use error::{ConfigError, ValidationError};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root client configuration
///
/// Every section has defaults, so an empty environment yields a working
/// configuration pointed at the default backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Backend API (base URL, timeout, environment)
    #[serde(default)]
    pub api: ApiConfig,

    /// Persisted session location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tracing filter directive; `RUST_LOG` takes precedence
    #[serde(default)]
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEDBOOK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MEDBOOK__API__BASE_URL=https://...` -> `api.base_url = ...`
    /// - `MEDBOOK__API__TIMEOUT_SECS=20` -> `api.timeout_secs = 20`
    /// - `MEDBOOK__STORAGE__SESSION_DIR=/tmp/medbook` -> `storage.session_dir`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEDBOOK")
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
        self.api.validate()?;
        Ok(())
    }
}
