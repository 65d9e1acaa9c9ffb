//! Handlers for users, profiles and the role vocabulary.

use axum::extract::State;
use axum::Json;
use echoarty_core::error::CoreError;
use echoarty_core::types::DbId;
use echoarty_db::models::role::RoleRow;
use echoarty_db::models::user::{UpdateUserProfile, UserResponse};
use echoarty_db::repositories::{ProfileRepo, RoleRepo, UserRepo};

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireGod;
use crate::response::ApiResponse;
use crate::state::AppState;

fn ensure_self_or_staff(caller: &AuthUser, user_id: DbId) -> Result<(), CoreError> {
    if caller.context().can_act_for(user_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "You can only access your own account".into(),
        ))
    }
}

/// GET /api/users
pub async fn list_users(
    RequireGod(_admin): RequireGod,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let mut profiles = ProfileRepo::map_all(&state.pool).await?;

    let data = users
        .iter()
        .map(|user| UserResponse::new(user, profiles.remove(&user.id)))
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

/// GET /api/users/{id}
pub async fn get_user(
    caller: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    ensure_self_or_staff(&caller, id)?;

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    let profile = ProfileRepo::find_by_user(&state.pool, id).await?;

    Ok(Json(ApiResponse::ok(UserResponse::new(&user, profile))))
}

/// PUT /api/users/{id}/profile
///
/// Partial edit; creates the profile when the user has none yet.
pub async fn update_profile(
    caller: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateUserProfile>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    ensure_self_or_staff(&caller, id)?;

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    let profile = ProfileRepo::upsert(&state.pool, id, &input).await?;
    tracing::info!(user_id = id, updated_by = caller.user_id, "Profile updated");

    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        UserResponse::new(&user, Some(profile)),
    )))
}

/// GET /api/roles
pub async fn list_roles(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<RoleRow>>>> {
    let roles = RoleRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(roles)))
}
