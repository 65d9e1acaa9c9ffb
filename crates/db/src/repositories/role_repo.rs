//! Repository for the `roles` table.

use sqlx::PgPool;

use crate::models::role::RoleRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at";

/// Read-only access to the seeded roles.
pub struct RoleRepo;

impl RoleRepo {
    /// List all roles ordered by ID ascending (most privileged first).
    pub async fn list(pool: &PgPool) -> Result<Vec<RoleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, RoleRow>(&query).fetch_all(pool).await
    }
}
