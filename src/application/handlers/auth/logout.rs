//! LogoutHandler - ends the session locally, notifying the backend if it can.

use tracing::{info, warn};

use crate::application::api_error::ApiError;
use crate::application::pipeline::{Credential, RequestPipeline};
use crate::application::ClientError;
use crate::domain::session::SessionEvent;
use crate::ports::ApiRequest;

/// Outcome of a logout. The local session is always cleared.
#[derive(Debug, Clone)]
pub struct LogoutResult {
    /// Why the backend notification failed, if it was attempted and failed.
    pub remote_error: Option<ApiError>,
}

impl LogoutResult {
    pub fn remote_acknowledged(&self) -> bool {
        self.remote_error.is_none()
    }
}

/// Handler for signing out.
pub struct LogoutHandler {
    pipeline: RequestPipeline,
}

impl LogoutHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self) -> Result<LogoutResult, ClientError> {
        let session = self.pipeline.session();

        let remote_error = if session.is_authenticated().await {
            match self
                .pipeline
                .execute(ApiRequest::post("/auth/logout"), Credential::Session)
                .await
            {
                Ok(_) => None,
                Err(e) => {
                    warn!(error = %e, "Remote logout failed, clearing local session anyway");
                    Some(e)
                }
            }
        } else {
            None
        };

        session.dispatch(SessionEvent::Logout).await?;
        info!("Signed out");

        Ok(LogoutResult { remote_error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::{MockReply, MockTransport};
    use crate::adapters::storage::InMemorySessionStorage;
    use crate::application::SessionContext;
    use crate::domain::foundation::{Role, UserId};
    use crate::domain::session::{AccessToken, UserSummary};
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;

    async fn handler(reply: MockReply) -> (LogoutHandler, Arc<MockTransport>, Arc<InMemorySessionStorage>) {
        let transport = Arc::new(MockTransport::new().on(Method::POST, "/auth/logout", reply));
        let storage = Arc::new(InMemorySessionStorage::new());
        let context = Arc::new(SessionContext::new(storage.clone()));
        context
            .dispatch(SessionEvent::LoginSuccess {
                user: UserSummary::new(UserId::new("1").unwrap(), None, None, Some(Role::Patient)),
                token: AccessToken::new("tok").unwrap(),
            })
            .await
            .unwrap();
        (LogoutHandler::new(RequestPipeline::new(transport.clone(), context)), transport, storage)
    }

    #[tokio::test]
    async fn acknowledged_logout_clears_store() {
        let (handler, transport, storage) = handler(MockReply::json(200, json!({"success": true}))).await;
        let result = handler.handle().await.unwrap();
        assert!(result.remote_acknowledged());
        assert!(storage.is_empty().await);
        assert_eq!(transport.requests()[0].header("Authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn failed_remote_logout_still_clears_store() {
        let (handler, _, storage) = handler(MockReply::json(500, json!({"message": "boom"}))).await;
        let result = handler.handle().await.unwrap();
        assert_eq!(result.remote_error.map(|e| e.message).as_deref(), Some("boom"));
        assert!(storage.is_empty().await);
        assert!(!handler.pipeline.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn offline_logout_still_clears_store() {
        let (handler, _, storage) = handler(MockReply::timeout()).await;
        assert!(!handler.handle().await.unwrap().remote_acknowledged());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn signed_out_logout_skips_remote_call() {
        let transport = Arc::new(MockTransport::new());
        let context = Arc::new(SessionContext::new(Arc::new(InMemorySessionStorage::new())));
        let handler = LogoutHandler::new(RequestPipeline::new(transport.clone(), context));
        assert!(handler.handle().await.unwrap().remote_acknowledged());
        assert!(transport.requests().is_empty());
    }
}
