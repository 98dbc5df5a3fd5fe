//! Session Storage Port - Interface for the persisted session record.
//!
//! Holds the bearer token and the serialized user under two keys
//! (`token`, `user`). The record survives process restarts and is replaced
//! as a whole, never merged field by field.

use async_trait::async_trait;

use crate::domain::foundation::ErrorCode;
use crate::domain::session::{AccessToken, SessionCredentials, UserSummary};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the serialized user.
pub const USER_KEY: &str = "user";

/// Errors that can occur during session storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl StorageError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::StorageError
    }
}

/// Port for the persisted session record.
///
/// Readers never observe a half-written record: `write` replaces both keys
/// as one unit and `read` reports `Empty` for anything that is not a
/// complete, well-formed pair.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Load the last persisted credentials.
    ///
    /// # Returns
    /// `SessionCredentials::Empty` if nothing was written, the record was
    /// cleared, or the record is partial or corrupt.
    ///
    /// # Errors
    /// Returns `StorageError::IoError` only when the backing medium itself
    /// fails.
    async fn read(&self) -> Result<SessionCredentials, StorageError>;

    /// Overwrite both keys.
    ///
    /// # Errors
    /// Returns `StorageError` if the record could not be replaced; the
    /// previous record is then left intact.
    async fn write(&self, user: &UserSummary, token: &AccessToken) -> Result<(), StorageError>;

    /// Remove both keys. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), StorageError>;
}
