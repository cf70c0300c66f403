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
    /// Configured storage backend (`memory` or `postgres`).
    pub storage: &'static str,
    /// Whether the storage backend answered its liveness probe.
    pub storage_healthy: bool,
}

/// GET /health -- returns service and storage health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let services = &state.services;
    let storage_healthy =
        services.sports.ping().await.is_ok() && services.ski_lifts.ping().await.is_ok();

    let status = if storage_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        storage: state.config.storage.name(),
        storage_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
