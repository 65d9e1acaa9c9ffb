//! User and profile entity models and DTOs.

use echoarty_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `user_profiles` (1:1 with `users`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    #[serde(skip_serializing)]
    pub user_id: DbId,
    pub firstname: String,
    pub lastname: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub telephone: String,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub role_id: DbId,
    pub created_at: Timestamp,
    pub user_info: Option<UserProfile>,
}

impl UserResponse {
    pub fn new(user: &User, profile: Option<UserProfile>) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role_id: user.role_id,
            created_at: user.created_at,
            user_info: profile,
        }
    }
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
}

/// DTO for the profile inserted alongside a new user.
#[derive(Debug, Clone)]
pub struct CreateUserProfile {
    pub firstname: String,
    pub lastname: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub telephone: String,
}

/// DTO for editing a profile. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserProfile {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub telephone: Option<String>,
}
