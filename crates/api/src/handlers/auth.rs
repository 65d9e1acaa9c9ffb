//! Handlers for registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use echoarty_core::error::CoreError;
use echoarty_core::identity::RegistrationForm;
use echoarty_core::roles::Role;
use echoarty_core::types::DbId;
use echoarty_db::models::user::{CreateUser, CreateUserProfile, UserProfile};
use echoarty_db::repositories::{ProfileRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_dummy, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/login`. Either `email` or `username` may carry
/// the identifier; both are matched against username and email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub role_id: DbId,
    pub user_info: Option<UserProfile>,
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/register
///
/// Create a customer account and its profile in one transaction.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RegistrationForm>,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisteredUser>>)> {
    let registration = form.validate_into()?;

    // Friendly pre-checks; the unique constraints still catch races.
    if UserRepo::find_by_username(&state.pool, &registration.username)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("Username already exists".into()).into());
    }
    if UserRepo::find_by_email(&state.pool, &registration.email)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("Email already exists".into()).into());
    }

    let password_hash = hash_password(&registration.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user_input = CreateUser {
        username: registration.username,
        email: registration.email,
        password_hash,
        role_id: Role::Customer.id(),
    };
    let profile = registration.profile;
    let profile_input = CreateUserProfile {
        firstname: profile.firstname,
        lastname: profile.lastname,
        street_address: profile.street_address,
        city: profile.city,
        postal_code: profile.postal_code,
        telephone: profile.telephone,
    };

    let (user, _profile) =
        UserRepo::create_with_profile(&state.pool, &user_input, &profile_input).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User registered successfully",
            RegisteredUser {
                user_id: user.id,
                username: user.username,
                email: user.email,
            },
        )),
    ))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/login
///
/// Authenticate by username or email. Every failure returns the same
/// `Invalid credentials` message; only the log line tells the causes apart.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    let identifier = non_blank(&input.email).or_else(|| non_blank(&input.username));
    let password = input.password.as_deref().filter(|v| !v.is_empty());

    let (Some(identifier), Some(password)) = (identifier, password) else {
        return Err(CoreError::Validation("Email/Username and password required".into()).into());
    };

    let Some(user) = UserRepo::find_by_identifier(&state.pool, identifier).await? else {
        verify_dummy(password);
        tracing::warn!(identifier, reason = "unknown_identifier", "Login failed");
        return Err(CoreError::invalid_credentials().into());
    };

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, reason = "wrong_password", "Login failed");
        return Err(CoreError::invalid_credentials().into());
    }

    let role = Role::from_id(user.role_id).ok_or_else(|| {
        AppError::InternalError(format!("User {} has unknown role id {}", user.id, user.role_id))
    })?;

    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let user_info = ProfileRepo::find_by_user(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, %role, "User logged in");

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        LoginData {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role_id: user.role_id,
            user_info,
            access_token,
            expires_in: state.config.jwt.expires_in_secs(),
        },
    )))
}
