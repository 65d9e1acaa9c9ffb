//! Route definitions for orders, checkout and the status vocabulary.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// ```text
/// GET   /orders           -> list_orders
/// POST  /orders           -> create_order
/// GET   /orders/{id}      -> get_order
/// PATCH /orders/{id}      -> update_order_status
/// POST  /cart/checkout    -> checkout
/// GET   /order-statuses   -> list_order_statuses
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/{id}",
            get(orders::get_order).patch(orders::update_order_status),
        )
        .route("/cart/checkout", post(orders::checkout))
        .route("/order-statuses", get(orders::list_order_statuses))
}
