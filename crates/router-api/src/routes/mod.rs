//! API route handlers

pub mod graph;
pub mod health;
pub mod markets;
pub mod route;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use swap_router::SwapRouteService;

use crate::dto::ApiError;
use crate::AppState;

/// Handler error: status plus JSON body
pub type HandlerError = (StatusCode, Json<ApiError>);

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/markets", put(markets::update_markets))
        .nest("/graph", graph::router())
        .nest("/route", route::router())
        .with_state(state)
}

/// Map an engine error to its HTTP status and code
pub(crate) fn router_error(err: router_core::Error) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::new(err.error_code(), err.to_string())))
}

/// Route service for the loaded markets, or 503 until markets are set
pub(crate) async fn require_service(state: &AppState) -> Result<Arc<SwapRouteService>, HandlerError> {
    state.service().await.ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("markets_not_loaded", "No market list loaded")),
        )
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use router_core::{Network, Token};
    use swap_router::fixed_point::{pow10, usd};
    use swap_router::{
        MarketSnapshot, NetworkMarkets, Pool, PoolReserves, SideReserve, TokenPrice, U256,
    };
    use tower::ServiceExt;

    pub fn markets() -> NetworkMarkets {
        NetworkMarkets {
            network: Network::Arbitrum,
            tokens: vec![
                Token::new("0xusdc", "USDC", 6),
                Token::new("0xeth", "WETH", 18),
                Token::new("0xwbtc", "WBTC", 8),
                Token::new("0xdai", "DAI", 18),
            ],
            pools: vec![
                Pool::new("0xp1", "0xeth", "0xeth", "0xusdc"),
                Pool::new("0xp2", "0xwbtc", "0xwbtc", "0xeth"),
            ],
        }
    }

    fn side(whole: u64, decimals: u8) -> SideReserve {
        SideReserve::new(U256::from(whole) * pow10(decimals).unwrap())
    }

    /// $1M on each side of both pools
    pub fn snapshot() -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::default();
        snapshot.reserves.insert(
            "0xp1",
            PoolReserves {
                long: side(500, 18),
                short: side(1_000_000, 6),
            },
        );
        snapshot.reserves.insert(
            "0xp2",
            PoolReserves {
                long: side(1_000_000 / 30_000, 8),
                short: side(500, 18),
            },
        );
        snapshot.prices.insert("0xusdc", TokenPrice::fixed(usd(1)));
        snapshot.prices.insert("0xeth", TokenPrice::fixed(usd(2_000)));
        snapshot.prices.insert("0xwbtc", TokenPrice::fixed(usd(30_000)));
        snapshot.prices.insert("0xdai", TokenPrice::fixed(usd(1)));
        snapshot
    }

    pub async fn loaded_state() -> AppState {
        let state = AppState::new();
        state.set_markets(markets()).await.unwrap();
        state
    }

    pub async fn send(
        state: AppState,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = create_router(state)
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_router_error_mapping() {
        let err: router_core::Error = router_core::RouteError::UnknownToken {
            token: "0xnope".into(),
        }
        .into();
        let (status, Json(body)) = router_error(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "unknown_token");
    }
}
