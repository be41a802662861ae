//! Liveness and readiness checks

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ErrorResponse, AppState};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `ready`
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Process is up
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// Process can reach its store
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = ErrorResponse)
    )
)]
pub async fn readiness(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ErrorResponse> {
    match state.services.users.check_store().await {
        Ok(()) => Ok(Json(HealthResponse::new("ready"))),
        Err(e) => {
            tracing::warn!("Store unreachable, reporting not ready: {}", e);
            Err(ErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Store unavailable",
            ))
        }
    }
}
