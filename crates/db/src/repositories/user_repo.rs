//! Repository for the `users` table.

use echoarty_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, CreateUserProfile, User, UserProfile};
use crate::repositories::profile_repo::PROFILE_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role_id, created_at, updated_at";

/// Identity store: users and their credentials.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user without a profile, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a user and its profile in one transaction.
    ///
    /// Either both rows exist afterwards or neither does.
    pub async fn create_with_profile(
        pool: &PgPool,
        user: &CreateUser,
        profile: &CreateUserProfile,
    ) -> Result<(User, UserProfile), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_query = format!(
            "INSERT INTO users (username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&user_query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role_id)
            .fetch_one(&mut *tx)
            .await?;

        let profile_query = format!(
            "INSERT INTO user_profiles
                (user_id, firstname, lastname, street_address, city, postal_code, telephone)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PROFILE_COLUMNS}"
        );
        let created_profile = sqlx::query_as::<_, UserProfile>(&profile_query)
            .bind(created.id)
            .bind(&profile.firstname)
            .bind(&profile.lastname)
            .bind(&profile.street_address)
            .bind(&profile.city)
            .bind(&profile.postal_code)
            .bind(&profile.telephone)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((created, created_profile))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user whose username or email equals `identifier`.
    ///
    /// A username match wins if one user's email equals another's username.
    pub async fn find_by_identifier(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE username = $1 OR email = $1
             ORDER BY (username = $1) DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }
}
