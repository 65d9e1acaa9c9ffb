//! Repository for the `user_profiles` table.

use std::collections::HashMap;

use echoarty_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{UpdateUserProfile, UserProfile};

pub(crate) const PROFILE_COLUMNS: &str =
    "user_id, firstname, lastname, street_address, city, postal_code, telephone";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch all profiles keyed by user id (avoids N+1 when listing users).
    pub async fn map_all(pool: &PgPool) -> Result<HashMap<DbId, UserProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM user_profiles");
        let rows = sqlx::query_as::<_, UserProfile>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|p| (p.user_id, p)).collect())
    }

    /// Apply a partial profile edit, creating the profile if it does not exist.
    ///
    /// Fields a new profile needs but the edit omits default to empty strings.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateUserProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles
                (user_id, firstname, lastname, street_address, city, postal_code, telephone)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''),
                     COALESCE($5, ''), COALESCE($6, ''), COALESCE($7, ''))
             ON CONFLICT (user_id) DO UPDATE SET
                firstname = COALESCE($2, user_profiles.firstname),
                lastname = COALESCE($3, user_profiles.lastname),
                street_address = COALESCE($4, user_profiles.street_address),
                city = COALESCE($5, user_profiles.city),
                postal_code = COALESCE($6, user_profiles.postal_code),
                telephone = COALESCE($7, user_profiles.telephone)
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(&input.firstname)
            .bind(&input.lastname)
            .bind(&input.street_address)
            .bind(&input.city)
            .bind(&input.postal_code)
            .bind(&input.telephone)
            .fetch_one(pool)
            .await
    }
}
