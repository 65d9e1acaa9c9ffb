//! Repositories for the `orders` ledger and `order_statuses` lookup table.

use echoarty_core::orders::OrderFilter;
use echoarty_core::status::OrderStatus;
use echoarty_core::types::DbId;
use sqlx::PgPool;

use crate::models::order::{CreateOrder, Order, OrderDetail, OrderStatusRow};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, user_id, product_id, quantity, total_amount, \
                                  shipping_address, description, bill_image, status_id, order_date";

/// Single-row insert shared by direct orders and checkout. Binds, in order:
/// user, product, quantity, total, address, description, bill image, status.
pub(crate) const INSERT: &str = "INSERT INTO orders \
        (user_id, product_id, quantity, total_amount, shipping_address, \
         description, bill_image, status_id) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)";

/// Joined projection used by [`OrderDetail`] queries.
const DETAIL_SELECT: &str = "SELECT o.id, o.user_id, u.username, o.product_id, \
        p.name AS product_name, p.image_url AS product_image_url, o.quantity, \
        o.total_amount, o.shipping_address, o.description, o.bill_image, \
        o.status_id, s.name AS status_name, o.order_date \
     FROM orders o \
     JOIN users u ON u.id = o.user_id \
     JOIN products p ON p.id = o.product_id \
     JOIN order_statuses s ON s.id = o.status_id";

pub struct OrderRepo;

impl OrderRepo {
    /// Insert a single order row.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!("{INSERT} RETURNING {COLUMNS}");
        sqlx::query_as::<_, Order>(&query)
            .bind(input.user_id)
            .bind(input.product_id)
            .bind(input.quantity)
            .bind(input.total_amount)
            .bind(&input.shipping_address)
            .bind(&input.description)
            .bind(&input.bill_image)
            .bind(input.status_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find one order with buyer, product and status names.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<OrderDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE o.id = $1");
        sqlx::query_as::<_, OrderDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List orders matching `filter`, most recent first.
    ///
    /// Scoping by caller role happens before this call; the filter is applied
    /// verbatim.
    pub async fn list(pool: &PgPool, filter: &OrderFilter) -> Result<Vec<OrderDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE ($1::BIGINT IS NULL OR o.user_id = $1)
               AND ($2::SMALLINT IS NULL OR o.status_id = $2)
             ORDER BY o.order_date DESC, o.id DESC"
        );
        sqlx::query_as::<_, OrderDetail>(&query)
            .bind(filter.user_id)
            .bind(filter.status.map(OrderStatus::id))
            .fetch_all(pool)
            .await
    }

    /// Overwrite the status of an order. Returns `None` if no order has `id`.
    ///
    /// Concurrent writers race; the last write wins.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: OrderStatus,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("UPDATE orders SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }
}

/// Read access to the status vocabulary.
pub struct OrderStatusRepo;

impl OrderStatusRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<OrderStatusRow>, sqlx::Error> {
        sqlx::query_as::<_, OrderStatusRow>("SELECT id, name FROM order_statuses ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }
}
