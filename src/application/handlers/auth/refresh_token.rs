//! RefreshTokenHandler - swaps the bearer token for a fresh one.

use serde_json::Value;

use super::TokenFields;
use crate::application::api_error::ApiError;
use crate::application::pipeline::{decode, Credential, RequestPipeline};
use crate::application::ClientError;
use crate::domain::session::{AccessToken, SessionError, SessionEvent};
use crate::ports::ApiRequest;

pub struct RefreshTokenHandler {
    pipeline: RequestPipeline,
}

impl RefreshTokenHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self) -> Result<AccessToken, ClientError> {
        let session = self.pipeline.session();
        if !session.is_authenticated().await {
            return Err(SessionError::no_active_session("session.token_refreshed").into());
        }

        let payload: Value = self
            .pipeline
            .execute(ApiRequest::post("/auth/refresh"), Credential::Session)
            .await?;
        let token = decode::<TokenFields>(payload.clone())?
            .access_token()
            .and_then(|t| AccessToken::new(t).ok())
            .ok_or_else(|| ApiError::decode("refresh response has no token", payload))?;

        session.dispatch(SessionEvent::TokenRefreshed(token.clone())).await?;
        Ok(token)
    }
}
