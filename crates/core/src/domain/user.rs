use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn generate() -> Self {
        Self(format!("U-{}", Uuid::new_v4().simple()))
    }
}

/// A registered seller account. `username` is the seller-chosen login
/// handle; both it and `email` are unique and either works as a login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let username = username.into();
        let name = name.into();
        let email = email.into();
        let password_hash = password_hash.into();

        if username.trim().is_empty() {
            return Err(DomainError::InvariantViolation("username must not be empty".to_string()));
        }
        if name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("name must not be empty".to_string()));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::InvariantViolation(
                "email must be a non-empty address".to_string(),
            ));
        }
        if password_hash.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "password hash must not be empty".to_string(),
            ));
        }

        Ok(Self { id: UserId::generate(), username, name, email, password_hash, created_at: Utc::now() })
    }
}

#[cfg(test)]
mod tests {
    use super::{User, UserId};

    #[test]
    fn new_user_gets_prefixed_id() {
        let user = User::new("ledsone", "LEDSONE Stores", "sales@ledsone.lk", "v1$ab$cd")
            .expect("valid user");
        assert!(user.id.0.starts_with("U-"));
        assert_eq!(user.username, "ledsone");
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(UserId::generate(), UserId::generate());
    }

    #[test]
    fn empty_username_is_rejected() {
        let result = User::new("  ", "Somebody", "a@b.lk", "v1$ab$cd");
        assert!(result.is_err());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let result = User::new("seller", "Somebody", "not-an-email", "v1$ab$cd");
        assert!(result.is_err());
    }
}
