//! Mock transport for testing.
//!
//! Scripted replies keyed by method and path, simulated latency, and call
//! tracking for verification.
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new()
//!     .on(Method::GET, "/doctors", MockReply::json(200, json!([])))
//!     .with_delay(Duration::from_millis(20));
//!
//! let response = transport.send(ApiRequest::get("/doctors")).await?;
//! assert_eq!(transport.requests().len(), 1);
//! ```

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ApiRequest, ApiResponse, HttpTransport, TransportError};

/// A configured reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(ApiResponse),
    Fail(TransportError),
}

impl MockReply {
    /// A JSON response with the given status.
    ///
    /// Unknown status codes fall back to 500.
    pub fn json(status: u16, body: Value) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        MockReply::Respond(ApiResponse::new(status, body))
    }

    /// A 200 response wrapped in the backend's `{success, data}` envelope.
    pub fn enveloped(data: Value) -> Self {
        Self::json(200, serde_json::json!({ "success": true, "data": data }))
    }

    pub fn timeout() -> Self {
        MockReply::Fail(TransportError::Timeout { timeout_secs: 10 })
    }

    pub fn connect_error(message: impl Into<String>) -> Self {
        MockReply::Fail(TransportError::Connect(message.into()))
    }
}

type RouteKey = (Method, String);

/// Mock HTTP transport.
///
/// Replies for one route are consumed in order; the last one keeps being
/// returned. Unscripted routes answer 404.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<HashMap<RouteKey, VecDeque<MockReply>>>>,
    delay: Duration,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reply for a route (builder form).
    pub fn on(self, method: Method, path: impl Into<String>, reply: MockReply) -> Self {
        self.push(method, path, reply);
        self
    }

    /// Simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Adds a reply for a route on a shared instance.
    pub fn push(&self, method: Method, path: impl Into<String>, reply: MockReply) {
        locked(&self.replies)
            .entry((method, path.into()))
            .or_default()
            .push_back(reply);
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        locked(&self.requests).clone()
    }

    /// Requests received for one route.
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<ApiRequest> {
        locked(&self.requests)
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    fn next_reply(&self, method: &Method, path: &str) -> MockReply {
        let mut replies = locked(&self.replies);
        match replies.get_mut(&(method.clone(), path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(not_found),
            Some(queue) => queue.front().cloned().unwrap_or_else(not_found),
            None => not_found(),
        }
    }
}

fn not_found() -> MockReply {
    MockReply::json(404, serde_json::json!({ "message": "Route not found" }))
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        locked(&self.requests).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply(&request.method, &request.path) {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(error) => Err(error),
        }
    }
}
