//! Order ledger entity models and DTOs.

use echoarty_core::status::StatusId;
use echoarty_core::types::{DbId, Money, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `orders` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub user_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub total_amount: Money,
    pub shipping_address: String,
    pub description: Option<String>,
    pub bill_image: Option<String>,
    pub status_id: StatusId,
    pub order_date: Timestamp,
}

/// An order joined with its buyer, product and status names.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct OrderDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub product_id: DbId,
    pub product_name: String,
    pub product_image_url: Option<String>,
    pub quantity: i32,
    pub total_amount: Money,
    pub shipping_address: String,
    pub description: Option<String>,
    pub bill_image: Option<String>,
    pub status_id: StatusId,
    pub status_name: String,
    pub order_date: Timestamp,
}

/// A row from the `order_statuses` lookup table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct OrderStatusRow {
    pub id: StatusId,
    pub name: String,
}

/// DTO for inserting one order row.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub user_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub total_amount: Money,
    pub shipping_address: String,
    pub description: Option<String>,
    pub bill_image: Option<String>,
    pub status_id: StatusId,
}

/// Result of a batch checkout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckoutOutcome {
    pub orders: Vec<Order>,
    /// Product ids from cart lines that no longer resolve.
    pub skipped_product_ids: Vec<DbId>,
}
