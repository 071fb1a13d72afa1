//! Application state shared across API handlers

use std::sync::Arc;

use router_core::{AppConfig, Network};
use swap_router::{GraphCache, NetworkMarkets, RouteArtifact, SwapRouteService};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur in the API layer
#[derive(Debug, Error)]
pub enum StateError {
    /// Market list for a network this instance does not serve
    #[error("Markets are for {found}, this server routes {expected}")]
    NetworkMismatch { found: Network, expected: Network },
}

/// Outcome of replacing the market list
#[derive(Debug, Clone)]
pub struct MarketsUpdate {
    /// Whether the pool list changed and the graph was rebuilt
    pub rebuilt: bool,
    pub graph_version: String,
    pub pool_count: usize,
}

/// Loaded markets: the versioned graph and the service routing over it
struct MarketsState {
    cache: GraphCache,
    service: Arc<SwapRouteService>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
    markets: RwLock<Option<MarketsState>>,
    artifact: RwLock<Option<Arc<RouteArtifact>>>,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                markets: RwLock::new(None),
                artifact: RwLock::new(None),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Get current network
    pub async fn network(&self) -> Network {
        self.inner.config.read().await.network
    }

    /// Route service for the loaded markets, if any
    pub async fn service(&self) -> Option<Arc<SwapRouteService>> {
        self.inner
            .markets
            .read()
            .await
            .as_ref()
            .map(|markets| Arc::clone(&markets.service))
    }

    /// Install a precomputed route artifact.
    ///
    /// Applies to the current service immediately and to every service built
    /// by later market updates.
    pub async fn set_artifact(&self, artifact: RouteArtifact) {
        let artifact = Arc::new(artifact);

        // Lock order: markets, then artifact.
        let mut markets = self.inner.markets.write().await;
        *self.inner.artifact.write().await = Some(Arc::clone(&artifact));
        if let Some(markets) = markets.as_mut() {
            let service = markets.service.as_ref().clone().with_artifact(&artifact);
            markets.service = Arc::new(service);
        }
    }

    /// Replace the market list.
    ///
    /// The graph is rebuilt only when the pool list version changes; the
    /// service is always rebuilt so token metadata updates take effect.
    pub async fn set_markets(&self, markets: NetworkMarkets) -> Result<MarketsUpdate, StateError> {
        let config = self.config().await;
        if markets.network != config.network {
            return Err(StateError::NetworkMismatch {
                found: markets.network,
                expected: config.network,
            });
        }

        let mut guard = self.inner.markets.write().await;
        let artifact = self.inner.artifact.read().await.clone();

        let (cache, rebuilt) = match guard.take() {
            Some(MarketsState { mut cache, .. }) => {
                let rebuilt = cache.update(&markets.pools);
                (cache, rebuilt)
            }
            None => (GraphCache::new(&markets.pools), true),
        };

        let graph = cache.graph();
        let mut service =
            SwapRouteService::new(config.network, Arc::clone(&graph), markets.registry(), &config.router);
        if let Some(artifact) = artifact {
            service = service.with_artifact(&artifact);
        }

        let update = MarketsUpdate {
            rebuilt,
            graph_version: graph.version_hex(),
            pool_count: graph.pool_count(),
        };
        tracing::info!(
            network = %config.network,
            version = %update.graph_version,
            pools = update.pool_count,
            rebuilt,
            "Markets updated"
        );

        *guard = Some(MarketsState {
            cache,
            service: Arc::new(service),
        });
        Ok(update)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
