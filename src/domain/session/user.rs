//! The user record carried by a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{role, Role, UserId, ValidationError};

/// Summary of the signed-in user as returned by the backend.
///
/// Only `id` is mandatory. The backend omits `name`/`email` on some
/// responses, and `role` is `None` whenever the backend sent something this
/// client does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUser")]
pub struct UserSummary {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UserSummary {
    /// Creates a user summary with a known role.
    pub fn new(
        id: UserId,
        name: Option<String>,
        email: Option<String>,
        role: Option<Role>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            role,
        }
    }

    /// Returns the user's name, falling back to email and then id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// Backend shape: document stores send `_id`, some endpoints send `id`, some both.
#[derive(Deserialize)]
struct RawUser {
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default, rename = "_id")]
    document_id: Option<UserId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, deserialize_with = "role::deserialize_lenient")]
    role: Option<Role>,
}

impl TryFrom<RawUser> for UserSummary {
    type Error = ValidationError;

    fn try_from(raw: RawUser) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.document_id)
            .ok_or_else(|| ValidationError::empty_field("user_id"))?;
        Ok(Self {
            id,
            name: raw.name,
            email: raw.email,
            role: raw.role,
        })
    }
}
