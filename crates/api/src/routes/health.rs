use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthData {
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub db_healthy: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub data: HealthData,
}

/// GET /api/health -- liveness. Always 200; `db_healthy` reports the database.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = echoarty_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check: database unreachable");
    }

    Json(HealthResponse {
        success: true,
        message: "EchoArty API is running",
        timestamp: Utc::now(),
        data: HealthData {
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
