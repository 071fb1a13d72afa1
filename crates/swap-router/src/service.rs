//! Swap Route Service
//!
//! Runtime entry point: resolves candidate paths for a token pair (from the
//! precomputed artifact when it has the pair, otherwise by a live search with
//! the same bounds) and selects the best one against the caller's snapshot.
//!
//! The service holds no mutable state; one instance can serve concurrent
//! requests, each with its own snapshot.

use std::sync::Arc;

use alloy_primitives::U256;
use router_core::{Network, Result, RouteError, RouterConfig, TokenAddress};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::evaluator::{
    evaluate_candidates, select_best_path, BestRoute, EvaluationContext, RankedCandidate,
    SelectorOptions,
};
use crate::graph::{build_graph, MarketGraph};
use crate::paths::{find_paths, CandidatePath, PathOptions};
use crate::precompute::{NetworkRoutes, RouteArtifact};
use crate::state::{MarketSnapshot, NetworkMarkets, TokenRegistry};

/// A route request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub from: TokenAddress,
    pub to: TokenAddress,
    /// Input in the source token's smallest unit
    pub amount_in: U256,
    /// Only consider paths whose final pool trades this index token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_index_token: Option<TokenAddress>,
}

impl RouteQuery {
    pub fn new(from: impl Into<TokenAddress>, to: impl Into<TokenAddress>, amount_in: U256) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount_in,
            required_index_token: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Found,
    /// No candidate path connects the pair
    NoRouteFound,
    /// Candidates exist but none passes liquidity and capacity checks
    NoEconomicalRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Precomputed,
    Live,
}

/// Every evaluated candidate of a request, for route debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDiagnostics {
    pub status: RouteStatus,
    pub source: CandidateSource,
    /// Source token after native-token mapping
    pub from: TokenAddress,
    pub to: TokenAddress,
    pub candidates: Vec<RankedCandidate>,
    pub best: Option<BestRoute>,
}

/// Candidate lookup and best-path selection for one network.
#[derive(Debug, Clone)]
pub struct SwapRouteService {
    network: Network,
    graph: Arc<MarketGraph>,
    registry: TokenRegistry,
    precomputed: Option<NetworkRoutes>,
    path_options: PathOptions,
    selector: SelectorOptions,
}

impl SwapRouteService {
    pub fn new(
        network: Network,
        graph: Arc<MarketGraph>,
        registry: TokenRegistry,
        config: &RouterConfig,
    ) -> Self {
        Self {
            network,
            graph,
            registry,
            precomputed: None,
            path_options: PathOptions::from_config(config),
            selector: SelectorOptions::from_config(config),
        }
    }

    pub fn from_markets(markets: &NetworkMarkets, config: &RouterConfig) -> Self {
        Self::new(
            markets.network,
            Arc::new(build_graph(&markets.pools)),
            markets.registry(),
            config,
        )
    }

    /// Serve stored candidates from `artifact` for this network.
    ///
    /// A graph-version mismatch only warns: stored paths through delisted
    /// pools are dropped when resolved, and new pairs fall back to live search.
    pub fn with_artifact(mut self, artifact: &RouteArtifact) -> Self {
        match artifact.network(&self.network) {
            Some(routes) => {
                if routes.max_hops != self.path_options.max_hops
                    || routes.max_candidates_per_depth != self.path_options.max_candidates_per_depth
                {
                    warn!(
                        network = %self.network,
                        artifact_max_hops = routes.max_hops,
                        artifact_max_candidates = routes.max_candidates_per_depth,
                        max_hops = self.path_options.max_hops,
                        max_candidates = self.path_options.max_candidates_per_depth,
                        "Route artifact was built with different search limits"
                    );
                }
                if routes.graph_version != self.graph.version_hex() {
                    warn!(
                        network = %self.network,
                        artifact_version = %routes.graph_version,
                        graph_version = %self.graph.version_hex(),
                        "Route artifact was built for a different pool list"
                    );
                }
                self.precomputed = Some(routes.clone());
            }
            None => {
                warn!(network = %self.network, "Route artifact has no routes for network");
            }
        }
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn graph(&self) -> &Arc<MarketGraph> {
        &self.graph
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub fn has_precomputed(&self) -> bool {
        self.precomputed.is_some()
    }

    fn resolve_token(&self, token: &TokenAddress) -> std::result::Result<TokenAddress, RouteError> {
        if !self.registry.contains(token) {
            return Err(RouteError::UnknownToken {
                token: token.to_string(),
            });
        }
        Ok(self.registry.resolve_native(token).clone())
    }

    /// Stored sequences for the pair, resolved against the current graph
    fn precomputed_candidates(
        &self,
        from: &TokenAddress,
        to: &TokenAddress,
        required_index: Option<&TokenAddress>,
    ) -> Option<Vec<CandidatePath>> {
        let routes = self.precomputed.as_ref()?;
        let stored = routes.routes_for(from, to)?;

        // A capped stored set may have cut off paths the index filter would keep
        if required_index.is_some() && stored.len() >= routes.max_candidates_per_depth {
            debug!(%from, %to, "Stored routes hit the candidate cap; searching live for index filter");
            return None;
        }

        let mut candidates = Vec::with_capacity(stored.len());
        for pool_ids in &stored {
            if pool_ids.len() > self.path_options.max_hops {
                continue;
            }
            match CandidatePath::from_pool_ids(&self.graph, from, pool_ids) {
                Some(path) => candidates.push(path),
                None => debug!(?pool_ids, "Dropping stored path that no longer resolves"),
            }
        }
        candidates.truncate(self.path_options.max_candidates_per_depth);

        if let Some(index) = required_index {
            candidates.retain(|path| path.terminal_index_token() == Some(index));
        }

        if candidates.is_empty() {
            None
        } else {
            Some(candidates)
        }
    }

    /// Candidate paths for `from -> to` and where they came from.
    pub fn candidates(
        &self,
        from: &TokenAddress,
        to: &TokenAddress,
        required_index: Option<&TokenAddress>,
    ) -> (Vec<CandidatePath>, CandidateSource) {
        if let Some(candidates) = self.precomputed_candidates(from, to, required_index) {
            return (candidates, CandidateSource::Precomputed);
        }
        let options = self
            .path_options
            .clone()
            .with_required_index(required_index.cloned());
        (find_paths(&self.graph, from, to, &options), CandidateSource::Live)
    }

    /// Best route for `query` against `snapshot`, or `None` when no
    /// economical route exists.
    pub fn get_route(&self, query: &RouteQuery, snapshot: &MarketSnapshot) -> Result<Option<BestRoute>> {
        let from = self.resolve_token(&query.from)?;
        let to = self.resolve_token(&query.to)?;

        let (candidates, source) =
            self.candidates(&from, &to, query.required_index_token.as_ref());
        debug!(
            %from,
            %to,
            candidates = candidates.len(),
            ?source,
            "Resolved swap candidates"
        );

        let ctx = EvaluationContext::new(&self.graph, &self.registry, snapshot);
        Ok(select_best_path(&candidates, query.amount_in, &ctx, &self.selector)?)
    }

    /// Like [`get_route`](Self::get_route), but returns every evaluated
    /// candidate and the reason when nothing is selected.
    pub fn get_route_diagnostics(
        &self,
        query: &RouteQuery,
        snapshot: &MarketSnapshot,
    ) -> Result<RouteDiagnostics> {
        let from = self.resolve_token(&query.from)?;
        let to = self.resolve_token(&query.to)?;

        let (candidates, source) =
            self.candidates(&from, &to, query.required_index_token.as_ref());
        let ctx = EvaluationContext::new(&self.graph, &self.registry, snapshot);
        let ranked = evaluate_candidates(&candidates, query.amount_in, &ctx, &self.selector)?;

        let best = ranked.iter().find(|c| !c.excluded).map(|c| BestRoute {
            path: c.path.clone(),
            evaluation: c.evaluation.clone(),
            candidate_index: c.index,
        });
        let status = if candidates.is_empty() {
            RouteStatus::NoRouteFound
        } else if best.is_none() {
            RouteStatus::NoEconomicalRoute
        } else {
            RouteStatus::Found
        };

        Ok(RouteDiagnostics {
            status,
            source,
            from,
            to,
            candidates: ranked,
            best,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precompute::precompute_network_routes;
    use crate::state::{ImpactConfig, ImpactConfigs, Pool, PoolReserves, SideReserve};
    use crate::test_utils::*;
    use router_core::{Error, PoolId, Token};

    fn config(max_hops: usize) -> RouterConfig {
        RouterConfig {
            max_hops,
            ..RouterConfig::default()
        }
    }

    fn markets(pools: Vec<Pool>) -> NetworkMarkets {
        let mut tokens = tokens();
        let mut native = Token::new("0xeeee", "ETH", 18);
        native.is_native = true;
        tokens.push(native);
        NetworkMarkets {
            network: Network::Arbitrum,
            tokens,
            pools,
        }
    }

    fn ids(route: &BestRoute) -> Vec<PoolId> {
        route.path.pool_ids()
    }

    // -- Scenarios A & B --

    #[test]
    fn test_two_hop_route_found() {
        let markets = markets(chain_pools());
        let service = SwapRouteService::from_markets(&markets, &config(2));
        let snapshot = snapshot_for(&markets.pools, 1_000_000, ImpactConfigs::default());

        let query = RouteQuery::new(USDC, WBTC, usdc_units(1_000));
        let diagnostics = service.get_route_diagnostics(&query, &snapshot).unwrap();
        assert_eq!(diagnostics.status, RouteStatus::Found);
        assert_eq!(diagnostics.source, CandidateSource::Live);
        assert_eq!(diagnostics.candidates.len(), 1);

        let best = service.get_route(&query, &snapshot).unwrap().unwrap();
        assert_eq!(ids(&best), vec![PoolId::new("0xp1"), PoolId::new("0xp2")]);
        assert!(best.evaluation.amount_out > U256::ZERO);
    }

    #[test]
    fn test_hop_limit_gives_no_route() {
        let markets = markets(chain_pools());
        let service = SwapRouteService::from_markets(&markets, &config(1));
        let snapshot = snapshot_for(&markets.pools, 1_000_000, ImpactConfigs::default());

        let query = RouteQuery::new(USDC, WBTC, usdc_units(1_000));
        assert!(service.get_route(&query, &snapshot).unwrap().is_none());
        let diagnostics = service.get_route_diagnostics(&query, &snapshot).unwrap();
        assert_eq!(diagnostics.status, RouteStatus::NoRouteFound);
        assert!(diagnostics.candidates.is_empty());
    }

    // -- Scenario C through the service --

    #[test]
    fn test_no_economical_route() {
        let pools = vec![Pool::new("0xp1", ETH, ETH, USDC)];
        let markets = markets(pools.clone());
        let service = SwapRouteService::from_markets(&markets, &config(3));
        let mut snapshot = snapshot_for(&pools, 1_000_000, ImpactConfigs::default());
        snapshot.reserves.insert(
            "0xp1",
            PoolReserves {
                long: SideReserve::new(eth_units(1)),
                short: SideReserve::new(usdc_units(1_000_000)),
            },
        );

        let query = RouteQuery::new(USDC, ETH, usdc_units(50_000));
        assert!(service.get_route(&query, &snapshot).unwrap().is_none());

        let diagnostics = service.get_route_diagnostics(&query, &snapshot).unwrap();
        assert_eq!(diagnostics.status, RouteStatus::NoEconomicalRoute);
        assert_eq!(diagnostics.candidates.len(), 1);
        assert!(diagnostics.candidates[0].excluded);
        assert!(diagnostics.best.is_none());
    }

    // -- Snapshot Handling --

    #[test]
    fn test_missing_reserves_skip_route_not_request() {
        let pools = vec![
            Pool::new("0xgone", ETH, ETH, USDC),
            Pool::new("0xlive", ETH, ETH, USDC),
        ];
        let markets = markets(pools.clone());
        let service = SwapRouteService::from_markets(&markets, &config(1));
        // No reserves for the first pool
        let snapshot = snapshot_for(&pools[1..], 1_000_000, ImpactConfigs::default());

        let query = RouteQuery::new(USDC, ETH, usdc_units(100));
        let best = service.get_route(&query, &snapshot).unwrap().unwrap();
        assert_eq!(ids(&best), vec![PoolId::new("0xlive")]);
    }

    #[test]
    fn test_reserves_come_from_each_call() {
        let pools = vec![
            Pool::new("0xa", ETH, ETH, USDC),
            Pool::new("0xb", ETH, ETH, USDC),
        ];
        let markets = markets(pools.clone());
        let service = SwapRouteService::from_markets(&markets, &config(1));
        let query = RouteQuery::new(USDC, ETH, usdc_units(100));

        let cheap_a = snapshot_for(
            &pools,
            1_000_000,
            ImpactConfigs::uniform(ImpactConfig::fee_only(30)).with_pool("0xa", ImpactConfig::fee_only(1)),
        );
        let cheap_b = snapshot_for(
            &pools,
            1_000_000,
            ImpactConfigs::uniform(ImpactConfig::fee_only(30)).with_pool("0xb", ImpactConfig::fee_only(1)),
        );

        let first = service.get_route(&query, &cheap_a).unwrap().unwrap();
        let second = service.get_route(&query, &cheap_b).unwrap().unwrap();
        assert_eq!(ids(&first), vec![PoolId::new("0xa")]);
        assert_eq!(ids(&second), vec![PoolId::new("0xb")]);
    }

    // -- Token Resolution --

    #[test]
    fn test_unknown_token_is_an_error() {
        let markets = markets(chain_pools());
        let service = SwapRouteService::from_markets(&markets, &config(2));
        let query = RouteQuery::new("0xnope", USDC, usdc_units(1));
        let err = service
            .get_route(&query, &MarketSnapshot::default())
            .unwrap_err();
        assert!(matches!(err, Error::Route(RouteError::UnknownToken { .. })));
    }

    #[test]
    fn test_native_token_routes_through_wrapped() {
        let markets = markets(chain_pools());
        let service = SwapRouteService::from_markets(&markets, &config(2));
        let snapshot = snapshot_for(&markets.pools, 1_000_000, ImpactConfigs::default());

        let query = RouteQuery::new("0xeeee", USDC, eth_units(1));
        let diagnostics = service.get_route_diagnostics(&query, &snapshot).unwrap();
        assert_eq!(diagnostics.from, addr(ETH));
        let best = diagnostics.best.unwrap();
        assert_eq!(ids(&best), vec![PoolId::new("0xp1")]);
    }

    #[test]
    fn test_native_to_wrapped_is_no_route() {
        let markets = markets(chain_pools());
        let service = SwapRouteService::from_markets(&markets, &config(2));
        let query = RouteQuery::new("0xeeee", ETH, eth_units(1));
        let diagnostics = service
            .get_route_diagnostics(&query, &MarketSnapshot::default())
            .unwrap();
        assert_eq!(diagnostics.status, RouteStatus::NoRouteFound);
    }

    // -- Precomputed Candidates --

    fn artifact_for(markets: &NetworkMarkets, service: &SwapRouteService) -> RouteArtifact {
        let mut artifact = RouteArtifact::new();
        artifact.insert(
            markets.network,
            precompute_network_routes(
                service.graph(),
                &markets.tokens,
                &PathOptions::from_config(&config(3)),
            ),
        );
        artifact
    }

    #[test]
    fn test_precomputed_candidates_used_both_directions() {
        let markets = markets(chain_pools());
        let live = SwapRouteService::from_markets(&markets, &config(3));
        let artifact = artifact_for(&markets, &live);
        let service = live.clone().with_artifact(&artifact);
        assert!(service.has_precomputed());
        let snapshot = snapshot_for(&markets.pools, 1_000_000, ImpactConfigs::default());

        for (from, to, amount) in [(USDC, WBTC, usdc_units(500)), (WBTC, USDC, units(WBTC, 1))] {
            let query = RouteQuery::new(from, to, amount);
            let diagnostics = service.get_route_diagnostics(&query, &snapshot).unwrap();
            assert_eq!(diagnostics.source, CandidateSource::Precomputed);
            assert_eq!(
                diagnostics.best,
                live.get_route(&query, &snapshot).unwrap(),
                "precomputed and live disagree for {} -> {}",
                from,
                to
            );
        }
    }

    #[test]
    fn test_stale_artifact_paths_are_dropped() {
        let markets = markets(chain_pools());
        let service = SwapRouteService::from_markets(&markets, &config(3));
        let artifact = artifact_for(&markets, &service);

        // P2 delisted after the artifact was built
        let relisted = self::markets(vec![chain_pools().remove(0)]);
        let service = SwapRouteService::from_markets(&relisted, &config(3)).with_artifact(&artifact);

        let (candidates, source) = service.candidates(&addr(USDC), &addr(WBTC), None);
        assert!(candidates.is_empty());
        assert_eq!(source, CandidateSource::Live);

        let (candidates, source) = service.candidates(&addr(USDC), &addr(ETH), None);
        assert_eq!(candidates.len(), 1);
        assert_eq!(source, CandidateSource::Precomputed);
    }

    #[test]
    fn test_required_index_filters_precomputed() {
        let pools = vec![
            Pool::new("0xa", ETH, ETH, USDC),
            Pool::new("0xb", WBTC, ETH, USDC),
        ];
        let markets = markets(pools);
        let service = SwapRouteService::from_markets(&markets, &config(3));
        let artifact = artifact_for(&markets, &service);
        let service = service.with_artifact(&artifact);

        let (all, _) = service.candidates(&addr(USDC), &addr(ETH), None);
        assert_eq!(all.len(), 2);

        let (filtered, source) = service.candidates(&addr(USDC), &addr(ETH), Some(&addr(WBTC)));
        assert_eq!(source, CandidateSource::Precomputed);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].pool_ids(), vec![PoolId::new("0xb")]);
    }

    #[test]
    fn test_artifact_for_other_network_is_ignored() {
        let markets = markets(chain_pools());
        let service = SwapRouteService::from_markets(&markets, &config(3));
        let mut artifact = artifact_for(&markets, &service);
        let routes = artifact.networks.remove(&Network::Arbitrum).unwrap();
        artifact.insert(Network::Avalanche, routes);

        let service = service.with_artifact(&artifact);
        assert!(!service.has_precomputed());
        let (_, source) = service.candidates(&addr(USDC), &addr(WBTC), None);
        assert_eq!(source, CandidateSource::Live);
    }

    #[test]
    fn test_precomputed_respects_service_hop_bound() {
        let markets = markets(chain_pools());
        let wide = SwapRouteService::from_markets(&markets, &config(3));
        let artifact = artifact_for(&markets, &wide);

        // Artifact holds the two-hop USDC -> WBTC path; a one-hop service must not serve it
        let narrow = SwapRouteService::from_markets(&markets, &config(1)).with_artifact(&artifact);
        let (candidates, source) = narrow.candidates(&addr(USDC), &addr(WBTC), None);
        assert!(candidates.is_empty());
        assert_eq!(source, CandidateSource::Live);

        let (candidates, source) = narrow.candidates(&addr(USDC), &addr(ETH), None);
        assert_eq!(candidates.len(), 1);
        assert_eq!(source, CandidateSource::Precomputed);
    }

    #[test]
    fn test_capped_artifact_index_query_searches_live() {
        let pools = vec![
            Pool::new("0xa", ETH, ETH, USDC),
            Pool::new("0xb", WBTC, ETH, USDC),
        ];
        let markets = markets(pools);
        let service = SwapRouteService::from_markets(&markets, &config(3));

        // Cap of one keeps only the first USDC -> ETH path, through 0xa
        let mut artifact = RouteArtifact::new();
        artifact.insert(
            markets.network,
            precompute_network_routes(
                service.graph(),
                &markets.tokens,
                &PathOptions {
                    max_candidates_per_depth: 1,
                    ..PathOptions::from_config(&config(3))
                },
            ),
        );
        let service = service.with_artifact(&artifact);

        let (unfiltered, source) = service.candidates(&addr(USDC), &addr(ETH), None);
        assert_eq!(source, CandidateSource::Precomputed);
        assert_eq!(unfiltered[0].pool_ids(), vec![PoolId::new("0xa")]);

        let (filtered, source) = service.candidates(&addr(USDC), &addr(ETH), Some(&addr(WBTC)));
        assert_eq!(source, CandidateSource::Live);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].pool_ids(), vec![PoolId::new("0xb")]);
    }
}
