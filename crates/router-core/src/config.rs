//! Configuration types for the swap router

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_CANDIDATES_PER_DEPTH, DEFAULT_MAX_HOPS};
use crate::{Error, Network};

/// Path search and selection limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Maximum pools in a single path
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Cap on cumulative completed paths before the search stops expanding
    #[serde(default = "default_max_candidates_per_depth")]
    pub max_candidates_per_depth: usize,

    /// Keep candidates that fail liquidity/capacity checks (ranked last)
    #[serde(default)]
    pub include_insufficient: bool,
}

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

fn default_max_candidates_per_depth() -> usize {
    DEFAULT_MAX_CANDIDATES_PER_DEPTH
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            max_candidates_per_depth: default_max_candidates_per_depth(),
            include_insufficient: false,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Network served by this instance
    pub network: Network,

    /// Path search limits
    #[serde(default)]
    pub router: RouterConfig,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Pool/token list produced by the discovery layer
    #[serde(default)]
    pub markets_path: Option<String>,

    /// Precomputed route artifact
    #[serde(default)]
    pub artifact_path: Option<String>,
}

fn default_api_port() -> u16 {
    19080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: Network::Arbitrum,
            router: RouterConfig::default(),
            api_port: default_api_port(),
            markets_path: None,
            artifact_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw).map_err(|e| Error::Serialization(e.to_string()))
    }
}
