//! LoginHandler - exchanges credentials for a session.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::TokenFields;
use crate::application::api_error::ApiError;
use crate::application::pipeline::{decode, encode, Credential, RequestPipeline};
use crate::application::ClientError;
use crate::domain::session::{AccessToken, LoginForm, SessionEvent, SessionState, UserSummary};
use crate::ports::ApiRequest;

/// Command to sign in.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: UserSummary,
    pub session: SessionState,
}

#[derive(Deserialize)]
struct LoginPayload {
    user: UserSummary,
    #[serde(flatten)]
    tokens: TokenFields,
}

/// Handler for signing in.
pub struct LoginHandler {
    pipeline: RequestPipeline,
}

impl LoginHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, ClientError> {
        // 1. Validate before anything leaves the client
        let form = LoginForm::new(&cmd.email, &cmd.password)?;
        let session = self.pipeline.session();

        // 2. Start the attempt
        session.dispatch(SessionEvent::LoginStart).await?;

        // 3. Exchange credentials
        let (user, token) = match self.exchange(&form).await {
            Ok(pair) => pair,
            Err(e) => {
                session.dispatch(SessionEvent::LoginFailure(e.message.clone())).await?;
                return Err(e.into());
            }
        };

        // 4. Sign in
        let state = session
            .dispatch(SessionEvent::LoginSuccess {
                user: user.clone(),
                token,
            })
            .await?;
        info!(user_id = %user.id, role = ?user.role, "Signed in");

        Ok(LoginResult { user, session: state })
    }

    async fn exchange(&self, form: &LoginForm) -> Result<(UserSummary, AccessToken), ApiError> {
        let request = ApiRequest::post("/auth/login").with_body(encode(form)?);
        let payload: Value = self.pipeline.execute(request, Credential::Anonymous).await?;
        let LoginPayload { user, tokens } = decode(payload.clone())?;

        let token = tokens
            .access_token()
            .and_then(|t| AccessToken::new(t).ok())
            .ok_or_else(|| ApiError::decode("login response has no access token", payload))?;
        Ok((user, token))
    }
}
