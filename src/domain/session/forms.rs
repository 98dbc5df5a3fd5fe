//! Validated sign-in and registration input.

use secrecy::{ExposeSecret, Secret};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::foundation::{Role, ValidationError};

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 50;

/// A password kept out of `Debug` output.
#[derive(Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Secret::new(value.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: Password,
}

impl LoginForm {
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = validate_email(email)?;
        let len = password.chars().count();
        if len == 0 {
            return Err(ValidationError::empty_field("password"));
        }
        if len < MIN_PASSWORD_LEN {
            return Err(too_short_password());
        }
        Ok(Self {
            email,
            password: Password::new(password),
        })
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: Password,
    pub role: Role,
}

impl RegistrationForm {
    pub fn new(
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        role: Role,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        let name_len = name.chars().count();
        if name_len == 0 {
            return Err(ValidationError::empty_field("name"));
        }
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name_len) {
            return Err(ValidationError::out_of_range("name", MIN_NAME_LEN, MAX_NAME_LEN, name_len));
        }

        let email = validate_email(email)?;
        validate_strong_password(password)?;
        if password != confirm_password {
            return Err(ValidationError::mismatch("confirm_password", "password"));
        }
        if !role.can_self_register() {
            return Err(ValidationError::invalid_format(
                "role",
                "must be patient or doctor",
            ));
        }

        Ok(Self {
            name: name.to_string(),
            email,
            password: Password::new(password),
            role,
        })
    }
}

fn too_short_password() -> ValidationError {
    ValidationError::invalid_format(
        "password",
        format!("must be at least {} characters", MIN_PASSWORD_LEN),
    )
}

fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    let invalid = || ValidationError::invalid_format("email", "not a valid email address");
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !host.ends_with('.') => {
            Ok(email.to_string())
        }
        _ => Err(invalid()),
    }
}

fn validate_strong_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len == 0 {
        return Err(ValidationError::empty_field("password"));
    }
    if len < MIN_PASSWORD_LEN {
        return Err(too_short_password());
    }
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(ValidationError::invalid_format(
            "password",
            "needs a lowercase letter, an uppercase letter and a digit",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_serializes_plain_body() {
        let form = LoginForm::new("a@b.com", "secret1").unwrap();
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            serde_json::json!({"email": "a@b.com", "password": "secret1"})
        );
    }

    #[test]
    fn login_form_hides_password_in_debug() {
        let form = LoginForm::new("a@b.com", "secret1").unwrap();
        let debug = format!("{:?}", form);
        assert!(!debug.contains("secret1"));
    }

    #[test]
    fn login_rejects_bad_email_and_short_password() {
        assert_eq!(LoginForm::new("nope", "secret1").unwrap_err().field(), "email");
        assert_eq!(LoginForm::new("a@b", "secret1").unwrap_err().field(), "email");
        assert_eq!(LoginForm::new("a@b.com", "12345").unwrap_err().field(), "password");
        assert!(matches!(
            LoginForm::new("", "secret1").unwrap_err(),
            ValidationError::EmptyField { .. }
        ));
    }

    #[test]
    fn registration_accepts_valid_doctor() {
        let form = RegistrationForm::new("Dr. Kaya", "kaya@clinic.org", "Secret1", "Secret1", Role::Doctor)
            .unwrap();
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["role"], "doctor");
        assert_eq!(body["name"], "Dr. Kaya");
    }

    #[test]
    fn registration_requires_mixed_password() {
        let err = RegistrationForm::new("Ali", "ali@x.io", "secret1", "secret1", Role::Patient).unwrap_err();
        assert_eq!(err.field(), "password");
    }

    #[test]
    fn registration_requires_matching_confirmation() {
        let err = RegistrationForm::new("Ali", "ali@x.io", "Secret1", "Secret2", Role::Patient).unwrap_err();
        assert!(matches!(err, ValidationError::Mismatch { .. }));
    }

    #[test]
    fn registration_rejects_admin_and_short_name() {
        let err = RegistrationForm::new("Ali", "ali@x.io", "Secret1", "Secret1", Role::Admin).unwrap_err();
        assert_eq!(err.field(), "role");
        let err = RegistrationForm::new("A", "ali@x.io", "Secret1", "Secret1", Role::Patient).unwrap_err();
        assert_eq!(err.field(), "name");
    }
}
