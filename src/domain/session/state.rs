//! In-memory session state.

use super::{AccessToken, SessionCredentials, UserSummary};
use crate::domain::foundation::Role;

/// Client-side record of the current session.
///
/// `is_authenticated` is derived from the credentials rather than stored, so
/// it cannot drift from the token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub credentials: SessionCredentials,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// Empty, unauthenticated state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// State hydrated from persisted credentials.
    pub fn hydrated(credentials: SessionCredentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials
            .token()
            .map(|t| !t.expose().is_empty())
            .unwrap_or(false)
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.credentials.user()
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.credentials.token()
    }

    pub fn role(&self) -> Option<Role> {
        self.credentials.role()
    }
}
