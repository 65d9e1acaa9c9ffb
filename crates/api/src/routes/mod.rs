pub mod auth;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                      liveness + database check (public)
///
/// /register                    create customer account (public)
/// /login                       authenticate (public)
///
/// /users                       list (god)
/// /users/{id}                  get (self or staff+)
/// /users/{id}/profile          update (self or staff+)
/// /roles                       role vocabulary (public)
///
/// /categories                  list (public), create (staff+)
/// /categories/{id}             delete (staff+)
/// /products                    list (public), create (staff+)
/// /products/{id}               get (public), update, delete (staff+)
/// /gallery                     list, ?category_id filter (public)
/// /gallery/detail/{id}         product detail (public)
///
/// /orders                      list (scoped), create (signed in)
/// /orders/{id}                 get (owner or staff+), change status (staff+)
/// /cart/checkout               batch checkout (signed in)
/// /order-statuses              status vocabulary (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(catalog::router())
        .merge(orders::router())
}
