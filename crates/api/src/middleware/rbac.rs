//! Role-based access control extractors.
//!
//! Each extractor runs the request's session through
//! [`echoarty_core::roles::authorize`] with a fixed minimum role. A missing
//! session rejects with 401; a role below the threshold rejects with 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use echoarty_core::error::CoreError;
use echoarty_core::roles::{authorize, Role};

use super::auth::{session_from_parts, AuthUser};
use crate::error::AppError;
use crate::state::AppState;

fn require(parts: &Parts, state: &AppState, required: Role) -> Result<AuthUser, AppError> {
    let session = session_from_parts(parts, state)?;
    authorize(session.as_ref(), required).map_err(CoreError::from)?;

    // `authorize` only succeeds with a session present.
    let session = session.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Authentication required".into()))
    })?;
    Ok(AuthUser {
        user_id: session.user_id,
        role: session.role,
    })
}

/// Requires the `god` role.
///
/// ```ignore
/// async fn god_only(RequireGod(user): RequireGod) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireGod(pub AuthUser);

impl FromRequestParts<AppState> for RequireGod {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Role::God).map(RequireGod)
    }
}

/// Requires `staff` or `god`.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Role::Staff).map(RequireStaff)
    }
}

/// Requires any signed-in user. Every role satisfies `customer`.
pub struct RequireCustomer(pub AuthUser);

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Role::Customer).map(RequireCustomer)
    }
}
