//! Health check endpoint

use axum::Json;

use crate::dto::HealthResponse;

/// GET /health - Liveness; does not require markets to be loaded
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}
