//! Error returned by application handlers.

use thiserror::Error;

use super::api_error::ApiError;
use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::session::SessionError;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Validation(e) => ErrorCode::from(e),
            ClientError::Api(e) => e.code(),
            ClientError::Session(e) => e.code(),
        }
    }

    /// The normalized API error, if the failure came from the backend.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }
}
