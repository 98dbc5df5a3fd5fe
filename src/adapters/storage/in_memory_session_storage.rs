//! In-Memory Session Storage Adapter
//!
//! Keeps the two session keys in memory.
//! Useful for testing and for runs that should not touch the disk.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::record;
use crate::domain::session::{AccessToken, SessionCredentials, UserSummary};
use crate::ports::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};

/// In-memory storage for the session record
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStorage {
    entries: Arc<RwLock<HashMap<&'static str, String>>>,
}

impl InMemorySessionStorage {
    /// Create a new, empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-seeded with raw entries (useful for tests)
    pub fn with_raw(token: Option<&str>, user: Option<&str>) -> Self {
        let mut entries = HashMap::new();
        if let Some(token) = token {
            entries.insert(TOKEN_KEY, token.to_string());
        }
        if let Some(user) = user {
            entries.insert(USER_KEY, user.to_string());
        }
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Raw value under a key
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Whether no key is set
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn read(&self) -> Result<SessionCredentials, StorageError> {
        let entries = self.entries.read().await;
        Ok(record::decode(
            entries.get(TOKEN_KEY).map(String::as_str),
            entries.get(USER_KEY).map(String::as_str),
        ))
    }

    async fn write(&self, user: &UserSummary, token: &AccessToken) -> Result<(), StorageError> {
        let user = record::encode_user(user)?;
        // Both keys change under one write lock.
        let mut entries = self.entries.write().await;
        entries.insert(TOKEN_KEY, token.expose().to_string());
        entries.insert(USER_KEY, user);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Role, UserId};

    fn user() -> UserSummary {
        UserSummary::new(UserId::new("1").unwrap(), None, None, Some(Role::Patient))
    }

    #[tokio::test]
    async fn new_storage_reads_empty() {
        let storage = InMemorySessionStorage::new();
        assert_eq!(storage.read().await.unwrap(), SessionCredentials::Empty);
    }

    #[tokio::test]
    async fn write_then_read() {
        let storage = InMemorySessionStorage::new();
        let token = AccessToken::new("tok123").unwrap();
        storage.write(&user(), &token).await.unwrap();

        let creds = storage.read().await.unwrap();
        assert_eq!(creds.role(), Some(Role::Patient));
        assert_eq!(creds.token(), Some(&token));
        assert_eq!(storage.raw(TOKEN_KEY).await.as_deref(), Some("tok123"));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let storage = InMemorySessionStorage::new();
        storage.write(&user(), &AccessToken::new("t").unwrap()).await.unwrap();
        storage.clear().await.unwrap();
        storage.clear().await.unwrap();
        assert!(storage.is_empty().await);
        assert_eq!(storage.read().await.unwrap(), SessionCredentials::Empty);
    }

    #[tokio::test]
    async fn partial_raw_record_reads_empty() {
        let storage = InMemorySessionStorage::with_raw(Some("tok"), None);
        assert_eq!(storage.read().await.unwrap(), SessionCredentials::Empty);
    }
}
