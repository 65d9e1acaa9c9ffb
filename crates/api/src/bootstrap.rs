//! Startup seeding of the god account.
//!
//! Roles cannot be changed through the API, so the only god account is the
//! one created here from `ADMIN_*` environment variables.

use anyhow::Context;
use echoarty_core::identity::validate_email_format;
use echoarty_core::roles::Role;
use echoarty_db::models::user::CreateUser;
use echoarty_db::repositories::UserRepo;
use echoarty_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::AdminBootstrap;

/// Create the god account unless a user with that username already exists.
///
/// Returns `true` when a new account was created.
pub async fn ensure_god_account(pool: &DbPool, admin: &AdminBootstrap) -> anyhow::Result<bool> {
    if let Some(existing) = UserRepo::find_by_username(pool, &admin.username).await? {
        if existing.role_id != Role::God.id() {
            tracing::warn!(
                user_id = existing.id,
                username = %existing.username,
                role_id = existing.role_id,
                "ADMIN_USERNAME names an existing non-god user; leaving it unchanged"
            );
        } else {
            tracing::debug!(user_id = existing.id, "God account already present");
        }
        return Ok(false);
    }

    validate_email_format(&admin.email).map_err(|_| anyhow::anyhow!("ADMIN_EMAIL is not a valid email"))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| anyhow::anyhow!("hashing ADMIN_PASSWORD failed: {e}"))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role_id: Role::God.id(),
        },
    )
    .await
    .context("creating god account")?;

    tracing::info!(user_id = user.id, username = %user.username, "God account created");
    Ok(true)
}
