//! Role entity model.

use echoarty_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A role row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleRow {
    #[serde(rename = "role_id")]
    pub id: DbId,
    #[serde(rename = "role_name")]
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}
