//! Application user accounts for the authentication layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Minimum accepted password length for sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Access role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRoleError(other.to_string())),
        }
    }
}

/// A persisted role string did not name any [`Role`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(pub String);

/// A registered application user.
///
/// `password_hash` is the salted digest produced by the auth service;
/// the clear-text password never reaches this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl AppUser {
    /// Check field-level invariants.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !is_plausible_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// Sign-up details, carrying the clear-text password exactly once on
/// its way into the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AppUser {
        AppUser {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "salt$digest".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn should_accept_valid_user() {
        assert!(user().validate().is_ok());
    }

    #[test]
    fn should_reject_empty_first_name() {
        let mut user = user();
        user.first_name = String::new();
        assert_eq!(user.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn should_reject_email_without_at_sign() {
        let mut user = user();
        user.email = "ada.example.com".to_string();
        assert_eq!(user.validate(), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn should_reject_email_with_bare_domain() {
        let mut user = user();
        user.email = "ada@localhost".to_string();
        assert_eq!(user.validate(), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn should_not_serialize_password_hash() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn should_roundtrip_role_strings() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!("root".parse::<Role>().is_err());
    }
}
