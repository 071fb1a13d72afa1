//! Offline Route Precomputation
//!
//! Enumerates candidate paths for every unordered pair of tradable tokens on a
//! network and stores the pool-id sequences in a versioned JSON artifact. The
//! runtime service loads the artifact at startup and only re-evaluates the
//! stored paths against live reserves.
//!
//! Each pair is searched once, from its lexicographically smaller token; the
//! mirrored direction is served by reversing the stored sequences.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use router_core::{Error, Network, PoolId, RouteError, Token, TokenAddress};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::artifact::{FORMAT_VERSION, PAIR_KEY_SEPARATOR};
use crate::graph::MarketGraph;
use crate::paths::{find_paths, PathOptions};

// ---------------------------------------------------------------------------
// Pair generation
// ---------------------------------------------------------------------------

/// Tokens worth routing between.
///
/// Platform utility tokens are dropped, and so is the native gas token when
/// the network lists its wrapped form (the wrapped token carries its routes).
pub fn eligible_tokens(tokens: &[Token]) -> Vec<&Token> {
    let has_wrapped = tokens.iter().any(|t| t.is_wrapped);
    tokens
        .iter()
        .filter(|t| !t.is_platform_token)
        .filter(|t| !(t.is_native && has_wrapped))
        .collect()
}

/// Every unordered pair once, as `(smaller, larger)` by address, sorted.
pub fn token_pairs<'a>(tokens: &[&'a Token]) -> Vec<(&'a TokenAddress, &'a TokenAddress)> {
    let mut addresses: Vec<&TokenAddress> = tokens.iter().map(|t| &t.address).collect();
    addresses.sort();
    addresses.dedup();

    let mut pairs = Vec::with_capacity(addresses.len() * addresses.len().saturating_sub(1) / 2);
    for (i, a) in addresses.iter().enumerate() {
        for b in &addresses[i + 1..] {
            pairs.push((*a, *b));
        }
    }
    pairs
}

/// Artifact key of an unordered pair, independent of argument order
pub fn pair_key(a: &TokenAddress, b: &TokenAddress) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!("{}{}{}", first, PAIR_KEY_SEPARATOR, second)
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// Stored routes of one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRoutes {
    /// Version of the graph the routes were enumerated on
    pub graph_version: String,
    pub max_hops: usize,
    pub max_candidates_per_depth: usize,
    /// Pool-id sequences per pair key, oriented from the pair's first token
    pub routes: BTreeMap<String, Vec<Vec<PoolId>>>,
}

impl NetworkRoutes {
    /// Stored sequences for `from -> to`, reversed when the request is the
    /// mirrored direction of the stored pair.
    pub fn routes_for(&self, from: &TokenAddress, to: &TokenAddress) -> Option<Vec<Vec<PoolId>>> {
        if from == to {
            return None;
        }
        let stored = self.routes.get(&pair_key(from, to))?;
        if from < to {
            Some(stored.clone())
        } else {
            Some(
                stored
                    .iter()
                    .map(|sequence| sequence.iter().rev().cloned().collect())
                    .collect(),
            )
        }
    }

    pub fn pair_count(&self) -> usize {
        self.routes.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }
}

/// Versioned precomputed-route artifact for any number of networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteArtifact {
    pub format_version: u32,
    pub networks: BTreeMap<Network, NetworkRoutes>,
}

impl Default for RouteArtifact {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            networks: BTreeMap::new(),
        }
    }
}

impl RouteArtifact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, network: Network, routes: NetworkRoutes) {
        self.networks.insert(network, routes);
    }

    pub fn network(&self, network: &Network) -> Option<&NetworkRoutes> {
        self.networks.get(network)
    }

    pub fn routes_for(
        &self,
        network: &Network,
        from: &TokenAddress,
        to: &TokenAddress,
    ) -> Option<Vec<Vec<PoolId>>> {
        self.network(network)?.routes_for(from, to)
    }

    /// Parse and check the format version.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let artifact: Self =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        if artifact.format_version != FORMAT_VERSION {
            return Err(RouteError::ArtifactFormat {
                found: artifact.format_version,
                expected: FORMAT_VERSION,
            }
            .into());
        }
        Ok(artifact)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| RouteError::ArtifactLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents).map_err(|e| match e {
            Error::Serialization(message) => RouteError::ArtifactLoad {
                path: path.display().to_string(),
                message,
            }
            .into(),
            other => other,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let json =
            serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| Error::Config(format!("failed to write {}: {}", path.display(), e)))
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Enumerate routes for every eligible pair of `tokens` on `graph`.
///
/// Pairs are searched in parallel; the graph is shared read-only. Pairs with
/// no route are left out of the result.
pub fn precompute_network_routes(
    graph: &MarketGraph,
    tokens: &[Token],
    options: &PathOptions,
) -> NetworkRoutes {
    let started = Instant::now();
    let eligible = eligible_tokens(tokens);
    let pairs = token_pairs(&eligible);
    let options = PathOptions {
        required_index_token: None,
        ..options.clone()
    };

    let routes: BTreeMap<String, Vec<Vec<PoolId>>> = pairs
        .par_iter()
        .filter_map(|(a, b)| {
            let paths = find_paths(graph, a, b, &options);
            if paths.is_empty() {
                return None;
            }
            let sequences: Vec<Vec<PoolId>> = paths.iter().map(|p| p.pool_ids()).collect();
            Some((pair_key(a, b), sequences))
        })
        .collect();

    let result = NetworkRoutes {
        graph_version: graph.version_hex(),
        max_hops: options.max_hops,
        max_candidates_per_depth: options.max_candidates_per_depth,
        routes,
    };

    info!(
        tokens = eligible.len(),
        pairs = pairs.len(),
        routed_pairs = result.pair_count(),
        routes = result.route_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Precomputed swap routes"
    );

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
