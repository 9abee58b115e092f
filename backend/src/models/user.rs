//! Models that represent users and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{types::UserId, validation::rules::validate_username};

#[derive(Debug, Clone, PartialEq, FromRow)]
/// Database representation of a user account.
pub struct User {
    /// Database-assigned identifier.
    pub id: UserId,
    /// Unique, case-sensitive login name.
    pub username: String,
    /// Argon2 PHC string; never the plaintext password.
    pub password_hash: String,
    /// Inactive accounts cannot log in.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Values required to insert a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Field changes applied to an existing user row. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none() && self.is_active.is_none()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for registering a new account.
pub struct CreateUser {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    /// Plaintext password; hashed before storage.
    #[serde(alias = "password_hash")]
    #[validate(length(min = 1, max = 128, code = "password_invalid_length"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
/// Payload for updating the caller's own account.
pub struct UpdateUser {
    /// New plaintext password; hashed before storage.
    #[serde(default, alias = "password_hash")]
    #[validate(length(min = 1, max = 128, code = "password_invalid_length"))]
    pub password: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Body returned after a successful login; the session travels in the cookie.
pub struct LoginResponse {
    pub message: String,
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// Public view of a user account.
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}
