//! reqwest-backed transport to the booking backend.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::ports::{ApiRequest, ApiResponse, HttpTransport, TransportError};

/// Sends pipeline requests over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport for `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// Parses a response body; non-JSON text is kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let mut builder = self
            .client
            .request(method, self.url(&request.path))
            .header("Content-Type", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| TransportError::Other(e.to_string()))?;
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        Ok(ApiResponse::new(status, parse_body(&text)))
    }
}
