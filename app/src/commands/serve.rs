//! HTTP route server

use std::path::Path;

use anyhow::{Context, Result};
use router_api::{start_server, AppState};
use router_core::{AppConfig, Network};
use swap_router::{NetworkMarkets, RouteArtifact};

/// Load config, markets and artifact, then serve until shutdown
pub async fn run(config_path: &Path, network: Option<Network>) -> Result<()> {
    let mut config = AppConfig::load(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(network) = network {
        config.network = network;
    }
    let state = AppState::with_config(config.clone());

    if let Some(path) = &config.artifact_path {
        let artifact = RouteArtifact::load(path)
            .with_context(|| format!("loading artifact from {}", path))?;
        state.set_artifact(artifact).await;
    }

    match &config.markets_path {
        Some(path) => {
            let markets = NetworkMarkets::load(path)
                .with_context(|| format!("loading markets from {}", path))?;
            state.set_markets(markets).await?;
        }
        None => tracing::warn!("No markets_path configured; routes unavailable until PUT /markets"),
    }

    start_server(state).await?;
    Ok(())
}
