//! Product entity model and DTOs.

use echoarty_core::types::{DbId, Money, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::category::CategoryTag;

/// Default aspect-ratio string for products created without one.
pub const DEFAULT_SIZE: &str = "1:1";

/// A row from the `products` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image_url: Option<String>,
    pub size: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A product together with its category tags, sorted by tag name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithCategories {
    #[serde(flatten)]
    pub product: Product,
    pub categories: Vec<CategoryTag>,
}

/// DTO for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image_url: Option<String>,
    pub size: Option<String>,
    pub category_ids: Vec<DbId>,
}

/// DTO for updating a product. `None` leaves a field unchanged;
/// `category_ids: Some(..)` replaces every link.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub image_url: Option<String>,
    pub size: Option<String>,
    pub category_ids: Option<Vec<DbId>>,
}
