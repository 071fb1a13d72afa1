//! Market list routes

use axum::{extract::State, http::StatusCode, Json};
use swap_router::NetworkMarkets;

use super::HandlerError;
use crate::dto::{ApiError, MarketsResponse};
use crate::{AppState, StateError};

/// PUT /markets - Replace the pool and token list
///
/// The graph is only rebuilt when the pool list changed.
pub async fn update_markets(
    State(state): State<AppState>,
    Json(markets): Json<NetworkMarkets>,
) -> Result<Json<MarketsResponse>, HandlerError> {
    let network = markets.network;
    let update = state.set_markets(markets).await.map_err(|e| match e {
        StateError::NetworkMismatch { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError::new("network_mismatch", e.to_string())),
        ),
    })?;

    Ok(Json(MarketsResponse {
        network: network.to_string(),
        graph_version: update.graph_version,
        pool_count: update.pool_count,
        rebuilt: update.rebuilt,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::routes::tests::{markets, send};
    use crate::AppState;

    #[tokio::test]
    async fn test_update_markets() {
        let state = AppState::new();
        let body = serde_json::to_value(markets()).unwrap();

        let (status, first) = send(state.clone(), Method::PUT, "/markets", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["network"], "arbitrum");
        assert_eq!(first["pool_count"], 2);
        assert_eq!(first["rebuilt"], true);

        let (_, second) = send(state.clone(), Method::PUT, "/markets", Some(body)).await;
        assert_eq!(second["rebuilt"], false);
        assert_eq!(second["graph_version"], first["graph_version"]);

        let (status, _) = send(state, Method::GET, "/graph", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_markets_wrong_network() {
        let mut other = markets();
        other.network = router_core::Network::Fuji;

        let (status, body) = send(
            AppState::new(),
            Method::PUT,
            "/markets",
            Some(serde_json::to_value(other).unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "network_mismatch");
    }
}
