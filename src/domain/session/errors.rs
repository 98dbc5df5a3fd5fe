//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// Errors raised when an event cannot be applied to the current session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The event needs a present session but the session is empty.
    #[error("Cannot apply '{event}' without an active session")]
    NoActiveSession { event: &'static str },
}

impl SessionError {
    pub fn no_active_session(event: &'static str) -> Self {
        SessionError::NoActiveSession { event }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NoActiveSession { .. } => ErrorCode::InvalidStateTransition,
        }
    }
}
