//! Bearer token and the both-or-neither credential pair.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

use super::UserSummary;
use crate::domain::foundation::{Role, ValidationError};

/// Opaque bearer credential issued at login.
///
/// The value is kept behind [`secrecy::Secret`] so that it never shows up in
/// `Debug` output or log lines.
#[derive(Clone)]
pub struct AccessToken(Secret<String>);

impl AccessToken {
    /// Wraps a token string. Empty or blank tokens are rejected.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::empty_field("token"));
        }
        Ok(Self(Secret::new(token)))
    }

    /// Exposes the raw token (for persisting and for the credential header).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AccessToken {}

/// The user/token pair, which only ever exists as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionCredentials {
    #[default]
    Empty,
    Present {
        user: UserSummary,
        token: AccessToken,
    },
}

impl SessionCredentials {
    /// Builds a present credential pair.
    pub fn present(user: UserSummary, token: AccessToken) -> Self {
        SessionCredentials::Present { user, token }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, SessionCredentials::Present { .. })
    }

    pub fn user(&self) -> Option<&UserSummary> {
        match self {
            SessionCredentials::Present { user, .. } => Some(user),
            SessionCredentials::Empty => None,
        }
    }

    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            SessionCredentials::Present { token, .. } => Some(token),
            SessionCredentials::Empty => None,
        }
    }

    /// Role of the signed-in user, if any and if recognized.
    pub fn role(&self) -> Option<Role> {
        self.user().and_then(|u| u.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn user() -> UserSummary {
        UserSummary::new(UserId::new("1").unwrap(), None, None, Some(Role::Patient))
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(AccessToken::new("").is_err());
        assert!(AccessToken::new("  ").is_err());
    }

    #[test]
    fn debug_output_redacts_token() {
        let token = AccessToken::new("tok123").unwrap();
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("tok123"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn bearer_header_value() {
        let token = AccessToken::new("tok123").unwrap();
        assert_eq!(token.bearer(), "Bearer tok123");
    }

    #[test]
    fn credentials_debug_hides_token() {
        let creds = SessionCredentials::present(user(), AccessToken::new("s3cr3t").unwrap());
        assert!(!format!("{:?}", creds).contains("s3cr3t"));
    }

    #[test]
    fn empty_credentials_have_no_parts() {
        let creds = SessionCredentials::default();
        assert!(!creds.is_present());
        assert!(creds.user().is_none());
        assert!(creds.token().is_none());
        assert!(creds.role().is_none());
    }

    #[test]
    fn present_credentials_expose_both_parts() {
        let creds = SessionCredentials::present(user(), AccessToken::new("t").unwrap());
        assert!(creds.is_present());
        assert_eq!(creds.role(), Some(Role::Patient));
        assert_eq!(creds.token().map(|t| t.expose()), Some("t"));
    }
}
