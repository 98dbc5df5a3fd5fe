//! File-based Session Storage Adapter
//!
//! Stores the session record as one JSON document (`session.json`) holding
//! the `token` and `user` keys. Writes go to a temporary file that is then
//! renamed over the old one, so a reader sees either the old record or the
//! new one.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::record;
use crate::domain::session::{AccessToken, SessionCredentials, UserSummary};
use crate::ports::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};

const FILE_NAME: &str = "session.json";
const TEMP_FILE_NAME: &str = "session.json.tmp";

/// File-based storage for the session record
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    base_path: PathBuf,
}

impl FileSessionStorage {
    /// Create a new file storage rooted at `base_path`
    ///
    /// The directory is created on first write.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the session document
    pub fn file_path(&self) -> PathBuf {
        self.base_path.join(FILE_NAME)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path.join(TEMP_FILE_NAME)
    }

    async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }
}

/// Writes `contents` to a file only the current user can read (0600 on unix).
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    // A leftover temp file keeps its old mode; `mode` only applies on create.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
    }
    file.write_all(contents).await?;
    file.sync_all().await
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn read(&self) -> Result<SessionCredentials, StorageError> {
        let contents = match fs::read_to_string(self.file_path()).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionCredentials::Empty)
            }
            Err(e) => return Err(StorageError::IoError(e.to_string())),
        };

        let document: Map<String, Value> = match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, path = %self.file_path().display(), "Session file is not a JSON object");
                return Ok(SessionCredentials::Empty);
            }
        };

        Ok(record::decode(
            document.get(TOKEN_KEY).and_then(Value::as_str),
            document.get(USER_KEY).and_then(Value::as_str),
        ))
    }

    async fn write(&self, user: &UserSummary, token: &AccessToken) -> Result<(), StorageError> {
        self.ensure_dir().await?;

        let mut document = Map::new();
        document.insert(TOKEN_KEY.to_string(), Value::String(token.expose().to_string()));
        document.insert(USER_KEY.to_string(), Value::String(record::encode_user(user)?));
        let contents = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;

        let temp = self.temp_path();
        write_private(&temp, contents.as_bytes())
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        fs::rename(&temp, self.file_path())
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        debug!(path = %self.file_path().display(), "Session persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.file_path()).await {
            Ok(()) => {
                debug!(path = %self.file_path().display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }
}
