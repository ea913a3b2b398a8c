//! Health check endpoints
//!
//! Kubernetes-compatible probes: `/health` and `/health/live` always
//! answer while the process runs; `/health/ready` verifies the database.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

fn response(status: &str, database: Option<String>) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(response("healthy", None))
}

/// Readiness probe; 503 when the database is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::health_check(state.db()).await {
        Ok(()) => Ok(Json(response("ready", Some("healthy".to_string())))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(response("not_ready", Some(e.to_string()))),
        )),
    }
}

/// Liveness probe
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(response("alive", None))
}
