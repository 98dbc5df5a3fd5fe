//! Session lifecycle events.
//!
//! Every change to the in-memory session goes through one of these events:
//! - `Hydrated` - credentials loaded from the persisted store at start-up
//! - `LoginStart` / `LoginSuccess` / `LoginFailure` - one login attempt
//! - `RegisterStart` / `RegisterSuccess` / `RegisterFailure` - one registration attempt
//! - `Logout` - user-initiated sign out
//! - `SessionInvalidated` - backend rejected the credential (HTTP 401)
//! - `TokenRefreshed` / `UserRefreshed` - partial refresh of a present session
//! - `ClearError` - dismiss the last error message

use super::{AccessToken, SessionCredentials, UserSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Hydrated(SessionCredentials),
    LoginStart,
    LoginSuccess { user: UserSummary, token: AccessToken },
    LoginFailure(String),
    RegisterStart,
    /// The account exists; the user is absent when the body did not carry one.
    RegisterSuccess(Option<UserSummary>),
    RegisterFailure(String),
    Logout,
    SessionInvalidated,
    TokenRefreshed(AccessToken),
    UserRefreshed(UserSummary),
    ClearError,
}

impl SessionEvent {
    /// Stable name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Hydrated(_) => "session.hydrated",
            SessionEvent::LoginStart => "login.start",
            SessionEvent::LoginSuccess { .. } => "login.success",
            SessionEvent::LoginFailure(_) => "login.failure",
            SessionEvent::RegisterStart => "register.start",
            SessionEvent::RegisterSuccess(_) => "register.success",
            SessionEvent::RegisterFailure(_) => "register.failure",
            SessionEvent::Logout => "session.logout",
            SessionEvent::SessionInvalidated => "session.invalidated",
            SessionEvent::TokenRefreshed(_) => "session.token_refreshed",
            SessionEvent::UserRefreshed(_) => "session.user_refreshed",
            SessionEvent::ClearError => "session.clear_error",
        }
    }
}
