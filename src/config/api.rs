//! Backend API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Host used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://health-app-xequ.onrender.com/api";

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Deployment the client talks to
    #[serde(default)]
    pub environment: Environment,
}

/// Backend deployment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if talking to production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Validate API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("api.base_url"));
        }
        let is_https = url.starts_with("https://");
        if !is_https && !url.starts_with("http://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.is_production() && !is_https {
            return Err(ValidationError::BaseUrlMustBeHttps);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            environment: Environment::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}
