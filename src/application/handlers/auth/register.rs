//! RegisterHandler - creates an account without signing in.

use serde_json::Value;
use tracing::{info, warn};

use super::UserPayload;
use crate::application::api_error::ApiError;
use crate::application::pipeline::{decode, encode, Credential, RequestPipeline};
use crate::application::ClientError;
use crate::domain::foundation::Role;
use crate::domain::session::{RegistrationForm, SessionEvent, UserSummary};
use crate::ports::ApiRequest;

/// Command to create an account.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

/// Result of a successful registration.
///
/// The account still needs email verification; no session is created.
/// `user` is `None` when the backend accepted the registration but its body
/// carried no readable user.
#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub user: Option<UserSummary>,
}

/// Handler for registration.
pub struct RegisterHandler {
    pipeline: RequestPipeline,
}

impl RegisterHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<RegisterResult, ClientError> {
        let form = RegistrationForm::new(
            &cmd.name,
            &cmd.email,
            &cmd.password,
            &cmd.confirm_password,
            cmd.role,
        )?;
        let session = self.pipeline.session();

        session.dispatch(SessionEvent::RegisterStart).await?;

        let outcome: Result<Value, ApiError> = async {
            let request = ApiRequest::post("/auth/register").with_body(encode(&form)?);
            self.pipeline.execute(request, Credential::Anonymous).await
        }
        .await;

        match outcome {
            Ok(payload) => {
                // Any 2xx means the account exists server-side.
                let user = match decode::<UserPayload>(payload) {
                    Ok(payload) => Some(payload.into_user()),
                    Err(e) => {
                        warn!(error = %e, raw = ?e.raw_data, "Registration accepted without a readable user");
                        None
                    }
                };
                session.dispatch(SessionEvent::RegisterSuccess(user.clone())).await?;
                match &user {
                    Some(user) => {
                        info!(user_id = %user.id, role = %cmd.role, "Registered, awaiting email verification")
                    }
                    None => info!(role = %cmd.role, "Registered, awaiting email verification"),
                }
                Ok(RegisterResult { user })
            }
            Err(e) => {
                session.dispatch(SessionEvent::RegisterFailure(e.message.clone())).await?;
                Err(e.into())
            }
        }
    }
}
