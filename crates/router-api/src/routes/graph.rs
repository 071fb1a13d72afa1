//! Graph inspection routes

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use router_core::TokenAddress;
use swap_router::reachable_tokens;

use super::{require_service, HandlerError};
use crate::dto::{ApiError, GraphResponse, ReachableRequest, ReachableResponse};
use crate::AppState;

/// Create graph routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_graph))
        .route("/reachable", post(get_reachable))
}

/// GET /graph - Summary of the current market graph
async fn get_graph(State(state): State<AppState>) -> Result<Json<GraphResponse>, HandlerError> {
    let service = require_service(&state).await?;
    let graph = service.graph();

    Ok(Json(GraphResponse {
        network: service.network().to_string(),
        version: graph.version_hex(),
        pool_count: graph.pool_count(),
        token_count: graph.token_count(),
        edge_count: graph.edge_count(),
        has_precomputed: service.has_precomputed(),
    }))
}

/// POST /graph/reachable - Tokens reachable from a source within the hop bound
async fn get_reachable(
    State(state): State<AppState>,
    Json(request): Json<ReachableRequest>,
) -> Result<Json<ReachableResponse>, HandlerError> {
    let service = require_service(&state).await?;
    let max_hops = match request.max_hops {
        Some(hops) => hops,
        None => state.config().await.router.max_hops,
    };

    let requested = TokenAddress::new(request.from);
    let from = service.registry().resolve_native(&requested).clone();
    if !service.graph().contains_token(&from) && !service.registry().contains(&from) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "unknown_token",
                format!("Unknown token: {}", requested),
            )),
        ));
    }

    let tokens: Vec<String> = reachable_tokens(service.graph(), &from, max_hops)
        .into_iter()
        .map(String::from)
        .collect();
    let count = tokens.len();

    Ok(Json(ReachableResponse {
        from: from.to_string(),
        tokens,
        count,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::tests::{loaded_state, send};
    use crate::AppState;

    #[tokio::test]
    async fn test_graph_requires_markets() {
        let (status, body) = send(AppState::new(), Method::GET, "/graph", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "markets_not_loaded");
    }

    #[tokio::test]
    async fn test_graph_summary() {
        let (status, body) = send(loaded_state().await, Method::GET, "/graph", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["network"], "arbitrum");
        assert_eq!(body["pool_count"], 2);
        assert_eq!(body["token_count"], 3);
        assert_eq!(body["edge_count"], 4);
        assert_eq!(body["has_precomputed"], false);
        assert_eq!(body["version"].as_str().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_reachable() {
        let state = loaded_state().await;
        let (status, body) = send(
            state.clone(),
            Method::POST,
            "/graph/reachable",
            Some(json!({ "from": "0xUSDC", "max_hops": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["from"], "0xusdc");
        assert_eq!(body["tokens"], json!(["0xeth"]));

        let (_, body) = send(
            state.clone(),
            Method::POST,
            "/graph/reachable",
            Some(json!({ "from": "0xusdc" })),
        )
        .await;
        assert_eq!(body["tokens"], json!(["0xeth", "0xwbtc"]));
        assert_eq!(body["count"], 2);

        let (status, body) = send(
            state,
            Method::POST,
            "/graph/reachable",
            Some(json!({ "from": "0xnope" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "unknown_token");
    }
}
