//! Health check endpoint

use ada_common::api::types::HealthResponse;
use ada_common::time;
use axum::{extract::State, routing::get, Json, Router};

use crate::AppState;

/// Service name reported to clients
pub const SERVICE_NAME: &str = "ADA Media Integrity Mock API";

/// API contract version the mobile client was built against
pub const API_VERSION: &str = "2.0";

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = time::now().signed_duration_since(state.startup_time);

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: API_VERSION.to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        active_sessions: state.sessions.len().await,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
