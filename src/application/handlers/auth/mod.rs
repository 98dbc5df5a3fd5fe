//! Authentication command handlers.

mod current_user;
mod login;
mod logout;
mod refresh_token;
mod register;

pub use current_user::{CurrentUserHandler, CurrentUserQuery};
pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use logout::{LogoutHandler, LogoutResult};
pub use refresh_token::RefreshTokenHandler;
pub use register::{RegisterCommand, RegisterHandler, RegisterResult};

use serde::Deserialize;

use crate::domain::session::UserSummary;

/// `{ user }` or a bare user object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum UserPayload {
    Wrapped { user: UserSummary },
    Bare(UserSummary),
}

impl UserPayload {
    pub(crate) fn into_user(self) -> UserSummary {
        match self {
            UserPayload::Wrapped { user } | UserPayload::Bare(user) => user,
        }
    }
}

/// Token fields the backend has used: `tokens.accessToken`, `accessToken`, `token`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenFields {
    #[serde(default)]
    tokens: Option<TokenPair>,
    #[serde(default, rename = "accessToken")]
    access_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenPair {
    #[serde(rename = "accessToken")]
    access_token: String,
}

impl TokenFields {
    /// First non-blank token, preferring the nested pair.
    pub(crate) fn access_token(self) -> Option<String> {
        self.tokens
            .map(|pair| pair.access_token)
            .into_iter()
            .chain(self.access_token)
            .chain(self.token)
            .find(|t| !t.trim().is_empty())
    }
}
