use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// Service metadata served at `/`.
#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub docs: &'static str,
    pub version: &'static str,
}

/// GET / -- service metadata.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the FishSense API!",
        docs: "/docs",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health -- returns service and database health.
///
/// Probes the pool directly so a saturated admission gate does not read as
/// an outage.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = fishsense_db::health_check(state.sessions.pool())
        .await
        .is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount root-level routes (NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
