//! Swap route query routes

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use swap_router::RouteDiagnostics;

use super::{require_service, router_error, HandlerError};
use crate::dto::{DiagnosticsResponse, RouteRequest, RouteResponse};
use crate::AppState;

/// Create route query routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(get_route))
        .route("/diagnostics", post(get_diagnostics))
}

async fn evaluate(state: &AppState, request: &RouteRequest) -> Result<RouteDiagnostics, HandlerError> {
    let service = require_service(state).await?;
    let query = request
        .to_query()
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(e)))?;

    service
        .get_route_diagnostics(&query, &request.snapshot)
        .map_err(router_error)
}

/// POST /route - Best route for a query against a snapshot
async fn get_route(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, HandlerError> {
    let diagnostics = evaluate(&state, &request).await?;
    tracing::debug!(
        from = %diagnostics.from,
        to = %diagnostics.to,
        status = ?diagnostics.status,
        "Route query"
    );
    Ok(Json(RouteResponse::from(&diagnostics)))
}

/// POST /route/diagnostics - Every evaluated candidate, ranked
async fn get_diagnostics(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<DiagnosticsResponse>, HandlerError> {
    let diagnostics = evaluate(&state, &request).await?;
    Ok(Json(DiagnosticsResponse::from(&diagnostics)))
}
