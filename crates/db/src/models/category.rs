//! Category (product tag) entity model.

use echoarty_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A category as linked to one product (join row with the product id).
#[derive(Debug, Clone, FromRow)]
pub struct ProductCategoryLink {
    pub product_id: DbId,
    pub id: DbId,
    pub name: String,
}

/// Compact tag embedded in product responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTag {
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}
