//! RequestPipeline - the one path every backend call takes.
//!
//! Outbound, it attaches the bearer credential of the current session.
//! Inbound, it unwraps the backend's response envelope, normalizes every
//! failure into an [`ApiError`], and turns a 401 on any session-routed
//! request into a session invalidation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::api_error::{ApiError, ApiErrorKind};
use super::session_context::SessionContext;
use crate::ports::{ApiRequest, HttpTransport};

/// Whether a request carries the session credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// Attach `Authorization: Bearer <token>` when a session exists.
    Session,
    /// Never attach a credential (sign-in and registration).
    Anonymous,
}

#[derive(Clone)]
pub struct RequestPipeline {
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionContext>,
}

impl RequestPipeline {
    pub fn new(transport: Arc<dyn HttpTransport>, session: Arc<SessionContext>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Sends a request and returns the unwrapped payload.
    ///
    /// # Errors
    ///
    /// Any failure, normalized. A 401 on a [`Credential::Session`] request
    /// also invalidates the session it was sent under before returning, even
    /// when no token was attached.
    pub async fn execute(&self, mut request: ApiRequest, credential: Credential) -> Result<Value, ApiError> {
        let sent = self.session.request_credential().await;
        let mut authenticated = false;
        if credential == Credential::Session {
            if let Some(token) = &sent.token {
                request.headers.push(("Authorization".to_string(), token.bearer()));
                authenticated = true;
            }
        }

        let method = request.method.clone();
        let path = request.path.clone();
        debug!(%method, %path, authenticated, "Sending request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                let error = ApiError::from_transport(&e);
                warn!(%method, %path, error = %error, "Request failed without response");
                return Err(error);
            }
        };

        if !response.status.is_success() {
            let error = ApiError::from_response(response.status, response.body);
            warn!(
                %method,
                %path,
                status = response.status.as_u16(),
                error = %error,
                "Request failed"
            );
            if error.kind == ApiErrorKind::AuthenticationInvalid && credential == Credential::Session {
                self.session.invalidate(sent.epoch).await;
            }
            return Err(error);
        }

        if self.session.is_superseded(&sent).await {
            debug!(%method, %path, "Discarding response for ended session");
            return Err(ApiError::superseded());
        }

        Ok(unwrap_envelope(response.body))
    }

    /// Sends and decodes into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest, credential: Credential) -> Result<T, ApiError> {
        let payload = self.execute(request, credential).await?;
        decode(payload)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(ApiRequest::get(path), Credential::Session).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let request = ApiRequest::post(path).with_body(encode(body)?);
        self.fetch(request, Credential::Session).await
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(ApiRequest::patch(path), Credential::Session).await
    }
}

/// Strips the `{ success, data }` envelope; bare payloads pass through.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("success") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub(crate) fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload.clone()).map_err(|e| ApiError::decode(e, payload))
}

pub(crate) fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::decode(e, Value::Null))
}
