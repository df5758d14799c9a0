use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Service is unhealthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": state.config.service_name,
                "version": state.config.service_version,
                "checks": { "postgres": "up" }
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "PostgreSQL health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": state.config.service_name,
                    "version": state.config.service_version,
                    "checks": { "postgres": "down" }
                })),
            )
        }
    }
}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "Not ready")
    ),
    tag = "Observability"
)]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.db.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}

/// API root
#[utoipa::path(
    get,
    path = "/api",
    responses((status = 200, description = "API name, version and endpoint groups")),
    tag = "Observability"
)]
pub async fn api_root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "Fitness API",
        "version": state.config.service_version,
        "endpoints": {
            "users": "/api/users/",
            "workouts": "/api/workouts/",
            "ai": "/api/ai/",
            "docs": "/docs"
        }
    }))
}
