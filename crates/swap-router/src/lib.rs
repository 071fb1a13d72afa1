//! Multi-Hop Swap Routing
//!
//! Routes swaps across two-sided synthetics markets: builds the token graph
//! from the pool list, enumerates bounded candidate paths, simulates each one
//! against a reserve/price snapshot (fees and imbalance-based price impact),
//! and selects the best. Candidate sets can be precomputed offline into a
//! versioned artifact and served at runtime.
//!
//! All economics are integer fixed-point: token amounts at their own decimals,
//! USD values, prices and factors at 30 decimals.

pub mod constants;
pub mod evaluator;
pub mod fixed_point;
pub mod graph;
pub mod paths;
pub mod precompute;
pub mod price_impact;
pub mod service;
pub mod state;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports
pub use alloy_primitives::{I256, U256};
pub use evaluator::{
    evaluate_candidates, evaluate_path, max_path_liquidity_usd, select_best_path, BestRoute,
    EvaluationContext, PathEvaluation, PathHop, RankedCandidate, SelectorOptions,
};
pub use graph::{build_graph, pool_list_version, reachable_tokens, GraphCache, MarketGraph, SwapDirection, SwapEdge};
pub use paths::{find_paths, CandidatePath, PathOptions};
pub use precompute::{
    eligible_tokens, pair_key, precompute_network_routes, token_pairs, NetworkRoutes, RouteArtifact,
};
pub use price_impact::{evaluate_hop, swap_price_impact, HopEvaluation};
pub use service::{CandidateSource, RouteDiagnostics, RouteQuery, RouteStatus, SwapRouteService};
pub use state::{
    ImpactConfig, ImpactConfigs, MarketSnapshot, NetworkMarkets, Pool, PoolReserves, PoolUsdState,
    PriceTable, ReserveSnapshot, Side, SideReserve, SideUsd, TokenPrice, TokenRegistry,
};
