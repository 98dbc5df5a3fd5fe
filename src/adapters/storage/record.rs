//! Decoding of the two-key session record shared by the storage adapters.

use tracing::warn;

use crate::domain::session::{AccessToken, SessionCredentials, UserSummary};
use crate::ports::StorageError;

/// Turns the raw `token`/`user` entries into credentials.
///
/// Anything short of a complete, parseable pair reads as `Empty`.
pub(crate) fn decode(token: Option<&str>, user: Option<&str>) -> SessionCredentials {
    match (token, user) {
        (None, None) => SessionCredentials::Empty,
        (Some(token), Some(user)) => {
            let token = match AccessToken::new(token) {
                Ok(token) => token,
                Err(_) => {
                    warn!("Persisted session has an empty token, treating as signed out");
                    return SessionCredentials::Empty;
                }
            };
            match serde_json::from_str::<UserSummary>(user) {
                Ok(user) => SessionCredentials::present(user, token),
                Err(e) => {
                    warn!(error = %e, "Persisted user record is unreadable, treating as signed out");
                    SessionCredentials::Empty
                }
            }
        }
        (token, _) => {
            warn!(
                has_token = token.is_some(),
                "Persisted session is missing one of its keys, treating as signed out"
            );
            SessionCredentials::Empty
        }
    }
}

/// Serializes the user entry.
pub(crate) fn encode_user(user: &UserSummary) -> Result<String, StorageError> {
    serde_json::to_string(user).map_err(|e| StorageError::SerializationFailed(e.to_string()))
}
