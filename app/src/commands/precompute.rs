//! Offline route precomputation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use router_core::RouterConfig;
use swap_router::{build_graph, precompute_network_routes, NetworkMarkets, PathOptions, RouteArtifact};

/// Build one artifact covering every market list in `markets`
pub fn build_artifact(markets: &[PathBuf], options: &PathOptions) -> Result<RouteArtifact> {
    let mut artifact = RouteArtifact::new();

    for path in markets {
        let markets = NetworkMarkets::load(path)
            .with_context(|| format!("loading markets from {}", path.display()))?;
        let graph = build_graph(&markets.pools);
        tracing::info!(
            network = %markets.network,
            pools = graph.pool_count(),
            tokens = graph.token_count(),
            version = %graph.version_hex(),
            "Precomputing routes"
        );

        let routes = precompute_network_routes(&graph, &markets.tokens, options);
        artifact.insert(markets.network, routes);
    }

    Ok(artifact)
}

pub fn run(markets: &[PathBuf], out: &Path, max_hops: usize, max_candidates: usize) -> Result<()> {
    let options = PathOptions::from_config(&RouterConfig {
        max_hops,
        max_candidates_per_depth: max_candidates,
        ..RouterConfig::default()
    });

    let artifact = build_artifact(markets, &options)?;
    artifact
        .save(out)
        .with_context(|| format!("writing artifact to {}", out.display()))?;

    tracing::info!(
        networks = artifact.networks.len(),
        path = %out.display(),
        "Route artifact written"
    );
    Ok(())
}
