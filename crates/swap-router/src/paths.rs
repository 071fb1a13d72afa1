//! Path Enumeration
//!
//! Bounded breadth-first search for candidate swap paths. Shorter paths come
//! first, and the order of results is fixed by the graph's edge order.
//!
//! The search is capped by the cumulative number of completed paths: once
//! `max_candidates_per_depth` paths have been found, the remaining expansions
//! are abandoned. Precomputed artifacts were generated under this exact rule,
//! so it must not change.

use std::collections::HashSet;

use router_core::constants::{DEFAULT_MAX_CANDIDATES_PER_DEPTH, DEFAULT_MAX_HOPS};
use router_core::{PoolId, RouterConfig, TokenAddress};
use serde::{Deserialize, Serialize};

use crate::graph::{MarketGraph, SwapEdge};

/// Search bounds for [`find_paths`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOptions {
    pub max_hops: usize,
    pub max_candidates_per_depth: usize,
    /// Only accept paths whose final pool trades this index token
    pub required_index_token: Option<TokenAddress>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            max_candidates_per_depth: DEFAULT_MAX_CANDIDATES_PER_DEPTH,
            required_index_token: None,
        }
    }
}

impl PathOptions {
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            max_hops: config.max_hops,
            max_candidates_per_depth: config.max_candidates_per_depth,
            required_index_token: None,
        }
    }

    pub fn with_required_index(mut self, index_token: Option<TokenAddress>) -> Self {
        self.required_index_token = index_token;
        self
    }
}

/// An ordered, non-empty sequence of swaps with no repeated pool or token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePath {
    edges: Vec<SwapEdge>,
}

impl CandidatePath {
    pub fn edges(&self) -> &[SwapEdge] {
        &self.edges
    }

    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }

    pub fn pool_ids(&self) -> Vec<PoolId> {
        self.edges.iter().map(|e| e.pool_id.clone()).collect()
    }

    /// Vertex sequence: source, intermediates, destination
    pub fn tokens(&self) -> Vec<TokenAddress> {
        let mut tokens = Vec::with_capacity(self.edges.len() + 1);
        if let Some(first) = self.edges.first() {
            tokens.push(first.from.clone());
        }
        tokens.extend(self.edges.iter().map(|e| e.to.clone()));
        tokens
    }

    pub fn from_token(&self) -> Option<&TokenAddress> {
        self.edges.first().map(|e| &e.from)
    }

    pub fn to_token(&self) -> Option<&TokenAddress> {
        self.edges.last().map(|e| &e.to)
    }

    /// Index token of the final pool
    pub fn terminal_index_token(&self) -> Option<&TokenAddress> {
        self.edges.last().map(|e| &e.index_token)
    }

    /// Resolve a stored pool-id sequence starting at `from`.
    ///
    /// `None` when a pool is gone from the graph, does not connect to the
    /// current token, or the sequence would repeat a pool or token.
    pub fn from_pool_ids(graph: &MarketGraph, from: &TokenAddress, pool_ids: &[PoolId]) -> Option<Self> {
        if pool_ids.is_empty() {
            return None;
        }

        let mut visited: HashSet<&TokenAddress> = HashSet::new();
        visited.insert(from);
        let mut used_pools: HashSet<&PoolId> = HashSet::new();
        let mut current = from;
        let mut edges = Vec::with_capacity(pool_ids.len());

        for pool_id in pool_ids {
            let edge = graph.edge(pool_id, current)?;
            if !used_pools.insert(&edge.pool_id) || !visited.insert(&edge.to) {
                return None;
            }
            current = &edge.to;
            edges.push(edge.clone());
        }

        Some(Self { edges })
    }

    /// The same pools traversed from the destination back to the source
    pub fn reversed(&self) -> Self {
        Self {
            edges: self.edges.iter().rev().map(SwapEdge::reversed).collect(),
        }
    }
}

struct PartialPath<'a> {
    current: &'a TokenAddress,
    edges: Vec<&'a SwapEdge>,
    visited: HashSet<&'a TokenAddress>,
    used_pools: HashSet<&'a PoolId>,
}

impl<'a> PartialPath<'a> {
    fn extend(&self, edge: &'a SwapEdge) -> Self {
        let mut edges = self.edges.clone();
        edges.push(edge);
        let mut visited = self.visited.clone();
        visited.insert(&edge.to);
        let mut used_pools = self.used_pools.clone();
        used_pools.insert(&edge.pool_id);
        Self {
            current: &edge.to,
            edges,
            visited,
            used_pools,
        }
    }

    fn complete(&self, last: &SwapEdge) -> CandidatePath {
        let mut edges: Vec<SwapEdge> = self.edges.iter().map(|&e| e.clone()).collect();
        edges.push(last.clone());
        CandidatePath { edges }
    }
}

/// Enumerate candidate paths from `from` to `to`.
///
/// Level-by-level BFS. At depth `d` every frontier path is expanded along
/// the outgoing edges of its last token in edge order:
/// - an edge reaching `to` completes a path, kept only if the final pool's
///   index token matches `required_index_token` (when set)
/// - any other unvisited token joins the next frontier while `d < max_hops`
///
/// Before each edge is considered, a cumulative result count at the cap ends
/// the search. Identical inputs always produce identical ordered output.
pub fn find_paths(
    graph: &MarketGraph,
    from: &TokenAddress,
    to: &TokenAddress,
    options: &PathOptions,
) -> Vec<CandidatePath> {
    let cap = options.max_candidates_per_depth;
    let mut results: Vec<CandidatePath> = Vec::new();

    if from == to || options.max_hops == 0 || cap == 0 || !graph.contains_token(from) {
        return results;
    }

    let mut visited = HashSet::new();
    visited.insert(from);
    let mut frontier = vec![PartialPath {
        current: from,
        edges: Vec::new(),
        visited,
        used_pools: HashSet::new(),
    }];

    for depth in 1..=options.max_hops {
        let mut next = Vec::new();

        'level: for partial in &frontier {
            for edge in graph.edges_from(partial.current) {
                if results.len() >= cap {
                    break 'level;
                }
                if partial.used_pools.contains(&edge.pool_id) || partial.visited.contains(&edge.to) {
                    continue;
                }

                if edge.to == *to {
                    let index_matches = options
                        .required_index_token
                        .as_ref()
                        .map_or(true, |index| *index == edge.index_token);
                    if index_matches {
                        results.push(partial.complete(edge));
                    }
                } else if depth < options.max_hops {
                    next.push(partial.extend(edge));
                }
            }
        }

        if results.len() >= cap || next.is_empty() {
            break;
        }
        frontier = next;
    }

    results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
