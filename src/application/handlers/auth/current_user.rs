//! CurrentUserHandler - reloads the signed-in user from the backend.

use crate::application::pipeline::RequestPipeline;
use crate::application::ClientError;
use crate::domain::session::{SessionError, SessionEvent, UserSummary};

use super::UserPayload;

/// Query for `GET /auth/me`.
#[derive(Debug, Clone, Default)]
pub struct CurrentUserQuery;

pub struct CurrentUserHandler {
    pipeline: RequestPipeline,
}

impl CurrentUserHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self, _query: CurrentUserQuery) -> Result<UserSummary, ClientError> {
        let session = self.pipeline.session();
        if !session.is_authenticated().await {
            return Err(SessionError::no_active_session("session.user_refreshed").into());
        }

        let user = self.pipeline.get::<UserPayload>("/auth/me").await?.into_user();
        session.dispatch(SessionEvent::UserRefreshed(user.clone())).await?;
        Ok(user)
    }
}
