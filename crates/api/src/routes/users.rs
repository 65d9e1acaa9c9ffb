//! Route definitions for users, profiles and roles.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// GET /users                -> list_users
/// GET /users/{id}           -> get_user
/// PUT /users/{id}/profile   -> update_profile
/// GET /roles                -> list_roles
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/profile", put(users::update_profile))
        .route("/roles", get(users::list_roles))
}
