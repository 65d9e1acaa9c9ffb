use anyhow::Context;
use echoarty_core::status::TransitionPolicy;

use crate::auth::jwt::JwtConfig;

/// Credentials for the god account created at startup, if configured.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// Everything except `JWT_SECRET` has a default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// Rule applied when staff change an order's status.
    pub transition_policy: TransitionPolicy,
    pub jwt: JwtConfig,
    pub admin: Option<AdminBootstrap>,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                  |
    /// |---------------------------|--------------------------|
    /// | `HOST`                    | `0.0.0.0`                |
    /// | `PORT`                    | `5000`                   |
    /// | `CORS_ORIGINS`            | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                     |
    /// | `DB_MAX_CONNECTIONS`      | `20`                     |
    /// | `ORDER_TRANSITION_POLICY` | `permissive`             |
    /// | `ADMIN_USERNAME` / `ADMIN_EMAIL` / `ADMIN_PASSWORD` | unset |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "5000")
            .parse()
            .context("PORT must be a valid u16")?;

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a valid u64")?;

        let db_max_connections: u32 = env_or("DB_MAX_CONNECTIONS", "20")
            .parse()
            .context("DB_MAX_CONNECTIONS must be a valid u32")?;

        let transition_policy: TransitionPolicy = env_or("ORDER_TRANSITION_POLICY", "permissive")
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("ORDER_TRANSITION_POLICY must be `permissive` or `strict`")?;

        let jwt = JwtConfig::from_env()?;
        let admin = admin_from_env();

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            db_max_connections,
            transition_policy,
            jwt,
            admin,
        })
    }
}

/// All three `ADMIN_*` variables must be set and non-empty.
fn admin_from_env() -> Option<AdminBootstrap> {
    let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    Some(AdminBootstrap {
        username: read("ADMIN_USERNAME")?,
        email: read("ADMIN_EMAIL")?,
        password: read("ADMIN_PASSWORD")?,
    })
}
