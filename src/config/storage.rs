//! Session storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where the persisted session lives
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `session.json`
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_dir: default_session_dir(),
        }
    }
}

/// `$HOME/.medbook`, or `.medbook` in the working directory without a home.
fn default_session_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".medbook")
}
