//! Role enum for the three kinds of platform users.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Role a user holds on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 3] = [Role::Patient, Role::Doctor, Role::Admin];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    /// Location of this role's own dashboard.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Patient => "/dashboard/patient",
            Role::Doctor => "/dashboard/doctor",
            Role::Admin => "/dashboard/admin",
        }
    }

    /// Whether the role may be chosen on the public registration form.
    ///
    /// Admin accounts are provisioned by the backend only.
    pub fn can_self_register(&self) -> bool {
        matches!(self, Role::Patient | Role::Doctor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Deserializes an optional role, mapping unknown or malformed values to `None`.
///
/// Used for user payloads coming from the backend: an unrecognized role must
/// never be promoted to a valid one, so it is dropped and the route guard
/// treats the user as misrouted everywhere a role is required.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|value| value.as_str())
        .and_then(|s| s.parse().ok()))
}
