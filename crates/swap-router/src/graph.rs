//! Market Graph
//!
//! Adjacency model of swap-capable pools. Tokens are nodes; every pool
//! contributes one directed edge per swap direction. The graph is immutable
//! once built and versioned by a hash of the pool list, so callers rebuild it
//! only when the list actually changes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy_primitives::{keccak256, B256};
use router_core::{PoolId, TokenAddress};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::{Pool, Side};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    LongToShort,
    ShortToLong,
}

impl SwapDirection {
    /// Pool side the swap pays into
    pub fn input_side(self) -> Side {
        match self {
            Self::LongToShort => Side::Long,
            Self::ShortToLong => Side::Short,
        }
    }

    /// Pool side the swap takes from
    pub fn output_side(self) -> Side {
        self.input_side().opposite()
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::LongToShort => Self::ShortToLong,
            Self::ShortToLong => Self::LongToShort,
        }
    }
}

/// A directed swap through one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEdge {
    pub pool_id: PoolId,
    pub from: TokenAddress,
    pub to: TokenAddress,
    pub index_token: TokenAddress,
    pub direction: SwapDirection,
}

impl SwapEdge {
    /// Same pool traversed the other way
    pub fn reversed(&self) -> Self {
        Self {
            pool_id: self.pool_id.clone(),
            from: self.to.clone(),
            to: self.from.clone(),
            index_token: self.index_token.clone(),
            direction: self.direction.reversed(),
        }
    }
}

/// Adjacency-list market graph.
#[derive(Debug, Clone, Default)]
pub struct MarketGraph {
    /// Outgoing edges per token, in pool-list order
    adjacency: HashMap<TokenAddress, Vec<SwapEdge>>,
    pools: HashMap<PoolId, Pool>,
    version: B256,
}

impl MarketGraph {
    pub fn edges_from(&self, token: &TokenAddress) -> &[SwapEdge] {
        self.adjacency.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edge through `pool_id` leaving `from`, if the pool connects there
    pub fn edge(&self, pool_id: &PoolId, from: &TokenAddress) -> Option<&SwapEdge> {
        self.edges_from(from).iter().find(|e| e.pool_id == *pool_id)
    }

    pub fn pool(&self, pool_id: &PoolId) -> Option<&Pool> {
        self.pools.get(pool_id)
    }

    pub fn contains_token(&self, token: &TokenAddress) -> bool {
        self.adjacency.contains_key(token)
    }

    /// Tokens with at least one edge, sorted by address
    pub fn tokens(&self) -> Vec<&TokenAddress> {
        let mut tokens: Vec<&TokenAddress> = self.adjacency.keys().collect();
        tokens.sort();
        tokens
    }

    pub fn version(&self) -> B256 {
        self.version
    }

    /// Version as a fixed-width hex string, as recorded in route artifacts
    pub fn version_hex(&self) -> String {
        hex::encode(self.version)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn token_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build the swap graph for one network's pool list.
///
/// Single-collateral pools are skipped, as are repeated pool ids (first wins).
/// Every other pool adds `long -> short` and `short -> long`.
pub fn build_graph(pools: &[Pool]) -> MarketGraph {
    let mut adjacency: HashMap<TokenAddress, Vec<SwapEdge>> = HashMap::new();
    let mut by_id: HashMap<PoolId, Pool> = HashMap::new();

    for pool in pools {
        if !pool.is_swap_capable() {
            debug!(pool = %pool.pool_id, "Skipping single-collateral pool");
            continue;
        }
        if by_id.contains_key(&pool.pool_id) {
            debug!(pool = %pool.pool_id, "Skipping duplicate pool id");
            continue;
        }

        let forward = SwapEdge {
            pool_id: pool.pool_id.clone(),
            from: pool.long_token.clone(),
            to: pool.short_token.clone(),
            index_token: pool.index_token.clone(),
            direction: SwapDirection::LongToShort,
        };
        let backward = forward.reversed();

        adjacency
            .entry(forward.from.clone())
            .or_default()
            .push(forward);
        adjacency
            .entry(backward.from.clone())
            .or_default()
            .push(backward);

        by_id.insert(pool.pool_id.clone(), pool.clone());
    }

    debug!(
        pools = by_id.len(),
        tokens = adjacency.len(),
        "Built market graph"
    );

    MarketGraph {
        adjacency,
        pools: by_id,
        version: pool_list_version(pools),
    }
}

/// Keccak-256 digest of the ordered pool tuples.
///
/// Each field is length-prefixed, so the digest is independent of the Rust
/// version and process and artifacts written by one build can be checked
/// against graphs built by another.
pub fn pool_list_version(pools: &[Pool]) -> B256 {
    let mut buf = Vec::with_capacity(pools.len() * 4 * 48);
    for pool in pools {
        for field in [
            pool.pool_id.as_str(),
            pool.index_token.as_str(),
            pool.long_token.as_str(),
            pool.short_token.as_str(),
        ] {
            buf.extend_from_slice(&(field.len() as u64).to_be_bytes());
            buf.extend_from_slice(field.as_bytes());
        }
    }
    keccak256(&buf)
}

/// Holds the current graph and rebuilds it only when the pool list changes.
#[derive(Debug, Clone)]
pub struct GraphCache {
    graph: Arc<MarketGraph>,
}

impl GraphCache {
    pub fn new(pools: &[Pool]) -> Self {
        Self {
            graph: Arc::new(build_graph(pools)),
        }
    }

    pub fn graph(&self) -> Arc<MarketGraph> {
        Arc::clone(&self.graph)
    }

    /// Returns `true` when the graph was rebuilt.
    pub fn update(&mut self, pools: &[Pool]) -> bool {
        if pool_list_version(pools) == self.graph.version() {
            return false;
        }
        self.graph = Arc::new(build_graph(pools));
        true
    }
}

/// Every token reachable from `from` within `max_hops`, in BFS order.
pub fn reachable_tokens(graph: &MarketGraph, from: &TokenAddress, max_hops: usize) -> Vec<TokenAddress> {
    let mut seen: HashSet<&TokenAddress> = HashSet::new();
    seen.insert(from);
    let mut frontier: Vec<&TokenAddress> = vec![from];
    let mut reached = Vec::new();

    for _ in 0..max_hops {
        let mut next = Vec::new();
        for token in frontier {
            for edge in graph.edges_from(token) {
                if seen.insert(&edge.to) {
                    reached.push(edge.to.clone());
                    next.push(&edge.to);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    reached
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    // -- Graph Construction --

    #[test]
    fn test_each_pool_adds_both_directions() {
        let pools = chain_pools();
        let graph = build_graph(&pools);

        assert_eq!(graph.pool_count(), 2);
        assert_eq!(graph.edge_count(), 4);
        for pool in &pools {
            let forward = graph.edge(&pool.pool_id, &pool.long_token).unwrap();
            let backward = graph.edge(&pool.pool_id, &pool.short_token).unwrap();
            assert_eq!(forward.to, pool.short_token);
            assert_eq!(forward.direction, SwapDirection::LongToShort);
            assert_eq!(backward.to, pool.long_token);
            assert_eq!(backward.direction, SwapDirection::ShortToLong);
            assert_eq!(forward.index_token, pool.index_token);
            assert_eq!(backward.index_token, pool.index_token);
        }
    }

    #[test]
    fn test_single_collateral_pool_has_no_edges() {
        let pools = vec![
            Pool::new("0xsingle", ETH, ETH, ETH),
            Pool::new("0xp1", ETH, ETH, USDC),
        ];
        let graph = build_graph(&pools);

        assert_eq!(graph.pool_count(), 1);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.pool(&PoolId::new("0xsingle")).is_none());
        assert!(graph
            .edges_from(&addr(ETH))
            .iter()
            .all(|e| e.pool_id.as_str() != "0xsingle"));
    }

    #[test]
    fn test_empty_graph() {
        let graph = build_graph(&[]);
        assert!(graph.is_empty());
        assert!(graph.edges_from(&addr(USDC)).is_empty());
        assert!(graph.tokens().is_empty());
    }

    #[test]
    fn test_edge_order_follows_pool_list() {
        let pools = vec![
            Pool::new("0xa", ETH, ETH, USDC),
            Pool::new("0xb", WBTC, WBTC, ETH),
            Pool::new("0xc", ETH, ETH, DAI),
        ];
        let graph = build_graph(&pools);
        let ids: Vec<&str> = graph
            .edges_from(&addr(ETH))
            .iter()
            .map(|e| e.pool_id.as_str())
            .collect();
        assert_eq!(ids, vec!["0xa", "0xb", "0xc"]);
    }

    #[test]
    fn test_duplicate_pool_ids_keep_first() {
        let pools = vec![
            Pool::new("0xp1", ETH, ETH, USDC),
            Pool::new("0xp1", WBTC, WBTC, DAI),
        ];
        let graph = build_graph(&pools);
        assert_eq!(graph.pool_count(), 1);
        assert!(!graph.contains_token(&addr(DAI)));
    }

    // -- Versioning --

    #[test]
    fn test_version_tracks_pool_list() {
        let pools = chain_pools();
        assert_eq!(pool_list_version(&pools), pool_list_version(&chain_pools()));

        let mut changed = chain_pools();
        changed.push(Pool::new("0xp3", DAI, DAI, USDC));
        assert_ne!(pool_list_version(&pools), pool_list_version(&changed));

        // Field boundaries are part of the hash
        let a = vec![Pool::new("0xab", "0xc", "0xd", "0xe")];
        let b = vec![Pool::new("0xa", "0xbc", "0xd", "0xe")];
        assert_ne!(pool_list_version(&a), pool_list_version(&b));
    }

    #[test]
    fn test_version_hex_is_fixed_width() {
        let graph = build_graph(&chain_pools());
        assert_eq!(graph.version_hex().len(), 64);
        assert_eq!(hex::decode(graph.version_hex()).unwrap(), graph.version().as_slice());
        assert_ne!(graph.version_hex(), build_graph(&[]).version_hex());
    }

    #[test]
    fn test_cache_rebuilds_only_on_change() {
        let pools = chain_pools();
        let mut cache = GraphCache::new(&pools);
        let first = cache.graph();

        assert!(!cache.update(&pools));
        assert!(Arc::ptr_eq(&first, &cache.graph()));

        let mut changed = pools.clone();
        changed.push(Pool::new("0xp3", DAI, DAI, USDC));
        assert!(cache.update(&changed));
        assert!(!Arc::ptr_eq(&first, &cache.graph()));
        assert_eq!(cache.graph().pool_count(), 3);
    }

    // -- Reachability --

    #[test]
    fn test_reachable_tokens() {
        let graph = build_graph(&chain_pools());
        assert_eq!(reachable_tokens(&graph, &addr(USDC), 1), vec![addr(ETH)]);
        assert_eq!(
            reachable_tokens(&graph, &addr(USDC), 2),
            vec![addr(ETH), addr(WBTC)]
        );
        assert!(reachable_tokens(&graph, &addr(DAI), 3).is_empty());
        assert!(reachable_tokens(&graph, &addr(USDC), 0).is_empty());
    }
}
