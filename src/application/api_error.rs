//! Normalized failure shape returned by the request pipeline.
//!
//! Every failed call, whatever went wrong on the wire, comes back as one
//! [`ApiError`]. Callers branch on [`ApiErrorKind`], never on transport
//! details.

use http::StatusCode;
use serde_json::Value;

use crate::domain::foundation::ErrorCode;
use crate::ports::TransportError;

/// Message used when neither the server nor the transport said anything useful.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 401; handled globally by invalidating the session.
    AuthenticationInvalid,
    /// 403.
    AuthorizationDenied,
    /// 404.
    NotFound,
    /// 5xx.
    Server,
    /// No response at all (offline, timeout).
    Transport,
    /// Any other non-success status.
    Client,
    /// A success response whose payload did not have the expected shape.
    Decode,
    /// The response arrived after the session it was sent for had ended.
    Superseded,
}

impl ApiErrorKind {
    fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => ApiErrorKind::AuthenticationInvalid,
            403 => ApiErrorKind::AuthorizationDenied,
            404 => ApiErrorKind::NotFound,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Client,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status_code: Option<u16>,
    pub message: String,
    pub raw_data: Option<Value>,
    pub kind: ApiErrorKind,
}

impl ApiError {
    /// Builds the error for a non-success response.
    ///
    /// Message precedence: the body's `message`, then its `error`, then the
    /// transport-level status line.
    pub fn from_response(status: StatusCode, body: Value) -> Self {
        let message = server_message(&body)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        Self {
            status_code: Some(status.as_u16()),
            message,
            raw_data: (!body.is_null()).then_some(body),
            kind: ApiErrorKind::from_status(status),
        }
    }

    /// Builds the error for a request that got no response.
    pub fn from_transport(error: &TransportError) -> Self {
        let message = error.to_string();
        Self {
            status_code: None,
            message: if message.trim().is_empty() {
                FALLBACK_MESSAGE.to_string()
            } else {
                message
            },
            raw_data: None,
            kind: ApiErrorKind::Transport,
        }
    }

    /// A success payload that could not be decoded.
    pub fn decode(error: impl std::fmt::Display, raw: Value) -> Self {
        Self {
            status_code: None,
            message: format!("Unexpected response from server: {}", error),
            raw_data: Some(raw),
            kind: ApiErrorKind::Decode,
        }
    }

    /// A response discarded because the session ended while it was in flight.
    pub fn superseded() -> Self {
        Self {
            status_code: None,
            message: "Session ended before the response arrived".to_string(),
            raw_data: None,
            kind: ApiErrorKind::Superseded,
        }
    }

    pub fn is_authentication_invalid(&self) -> bool {
        self.kind == ApiErrorKind::AuthenticationInvalid
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            ApiErrorKind::AuthenticationInvalid => ErrorCode::Unauthorized,
            ApiErrorKind::AuthorizationDenied => ErrorCode::Forbidden,
            ApiErrorKind::NotFound => ErrorCode::NotFound,
            ApiErrorKind::Server => ErrorCode::ServerError,
            ApiErrorKind::Transport => ErrorCode::NetworkError,
            ApiErrorKind::Client => ErrorCode::BadRequest,
            ApiErrorKind::Decode => ErrorCode::DecodeError,
            ApiErrorKind::Superseded => ErrorCode::SessionSuperseded,
        }
    }
}

/// First non-blank of `message`, `error` (string or `{message}`) in the body.
fn server_message(body: &Value) -> Option<String> {
    let non_blank = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(message) = body.get("message").and_then(non_blank) {
        return Some(message);
    }
    match body.get("error") {
        Some(Value::Object(inner)) => inner.get("message").and_then(non_blank),
        Some(other) => non_blank(other),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_server_message() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            json!({"message": "Email taken", "error": "Conflict"}),
        );
        assert_eq!(err.message, "Email taken");
        assert_eq!(err.status_code, Some(400));
        assert_eq!(err.kind, ApiErrorKind::Client);
        assert_eq!(err.raw_data, Some(json!({"message": "Email taken", "error": "Conflict"})));
    }

    #[test]
    fn falls_back_to_error_field() {
        let err = ApiError::from_response(StatusCode::FORBIDDEN, json!({"error": "Not your appointment"}));
        assert_eq!(err.message, "Not your appointment");
        assert_eq!(err.kind, ApiErrorKind::AuthorizationDenied);

        let nested = ApiError::from_response(StatusCode::NOT_FOUND, json!({"error": {"message": "Gone"}}));
        assert_eq!(nested.message, "Gone");
    }

    #[test]
    fn falls_back_to_status_line() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, Value::Null);
        assert_eq!(err.message, "Request failed with status code 502");
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert!(err.raw_data.is_none());
    }

    #[test]
    fn blank_server_message_is_skipped() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, json!({"message": "  ", "error": "Missing"}));
        assert_eq!(err.message, "Missing");
    }

    #[test]
    fn unauthorized_is_authentication_invalid() {
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, json!({}));
        assert!(err.is_authentication_invalid());
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn transport_error_keeps_transport_message() {
        let err = ApiError::from_transport(&TransportError::Timeout { timeout_secs: 10 });
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(err.status_code, None);
        assert_eq!(err.message, "Request timed out after 10s");
    }

    #[test]
    fn empty_transport_message_uses_fallback() {
        let err = ApiError::from_transport(&TransportError::Other(String::new()));
        assert_eq!(err.message, FALLBACK_MESSAGE);
    }
}
