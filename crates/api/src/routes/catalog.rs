//! Route definitions for categories, products and the gallery.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// ```text
/// GET    /categories            -> list_categories
/// POST   /categories            -> create_category
/// DELETE /categories/{id}       -> delete_category
/// GET    /products              -> list_products
/// POST   /products              -> create_product
/// GET    /products/{id}         -> get_product
/// PUT    /products/{id}         -> update_product
/// DELETE /products/{id}         -> delete_product
/// GET    /gallery               -> list_products
/// GET    /gallery/detail/{id}   -> get_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route("/categories/{id}", delete(catalog::delete_category))
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route("/gallery", get(catalog::list_products))
        .route("/gallery/detail/{id}", get(catalog::get_product))
}
