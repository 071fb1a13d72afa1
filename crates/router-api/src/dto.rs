//! Data Transfer Objects for API requests and responses
//!
//! Token amounts and USD values cross the wire as decimal strings.

use router_core::RouteError;
use serde::{Deserialize, Serialize};
use swap_router::{
    CandidatePath, CandidateSource, MarketSnapshot, PathEvaluation, PathHop, RankedCandidate,
    RouteDiagnostics, RouteQuery, RouteStatus, U256,
};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Graph DTOs
// =============================================================================

/// Graph summary response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResponse {
    pub network: String,
    /// Pool list version (hex)
    pub version: String,
    pub pool_count: usize,
    pub token_count: usize,
    pub edge_count: usize,
    /// Whether a precomputed route artifact is being served
    pub has_precomputed: bool,
}

/// Reachable tokens request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachableRequest {
    pub from: String,
    /// Defaults to the configured hop bound
    #[serde(default)]
    pub max_hops: Option<usize>,
}

/// Reachable tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachableResponse {
    pub from: String,
    pub tokens: Vec<String>,
    pub count: usize,
}

// =============================================================================
// Route DTOs
// =============================================================================

/// Route request: the query plus the market snapshot to evaluate against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub from: String,
    pub to: String,
    /// Input in the source token's smallest unit (decimal string)
    pub amount_in: String,
    #[serde(default)]
    pub required_index_token: Option<String>,
    #[serde(default)]
    pub snapshot: MarketSnapshot,
}

impl RouteRequest {
    /// Build the engine query, parsing `amount_in`
    pub fn to_query(&self) -> Result<RouteQuery, ApiError> {
        let amount_in = parse_amount(&self.amount_in)?;
        let mut query = RouteQuery::new(self.from.as_str(), self.to.as_str(), amount_in);
        query.required_index_token = self.required_index_token.as_deref().map(Into::into);
        Ok(query)
    }
}

/// Parse a decimal token amount
pub fn parse_amount(raw: &str) -> Result<U256, ApiError> {
    U256::from_str_radix(raw.trim(), 10).map_err(|e| {
        let err = RouteError::InvalidAmount {
            message: format!("'{}': {}", raw, e),
        };
        ApiError::new(err.error_code(), err.to_string())
    })
}

/// One hop of a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopDto {
    pub pool_id: String,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub amount_out: String,
    pub usd_in: String,
    pub fee_usd: String,
    pub price_impact_usd: String,
    pub output_usd: String,
    pub is_out_of_liquidity: bool,
    pub is_out_of_capacity: bool,
    pub is_stale: bool,
}

impl From<&PathHop> for HopDto {
    fn from(hop: &PathHop) -> Self {
        Self {
            pool_id: hop.pool_id.to_string(),
            token_in: hop.token_in.to_string(),
            token_out: hop.token_out.to_string(),
            amount_in: hop.amount_in.to_string(),
            amount_out: hop.amount_out.to_string(),
            usd_in: hop.evaluation.usd_in.to_string(),
            fee_usd: hop.evaluation.fee_usd.to_string(),
            price_impact_usd: hop.evaluation.price_impact_usd.to_string(),
            output_usd: hop.evaluation.output_usd.to_string(),
            is_out_of_liquidity: hop.evaluation.is_out_of_liquidity,
            is_out_of_capacity: hop.evaluation.is_out_of_capacity,
            is_stale: hop.evaluation.is_stale,
        }
    }
}

/// An evaluated route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDto {
    pub pool_ids: Vec<String>,
    pub tokens: Vec<String>,
    pub amount_in: String,
    pub amount_out: String,
    pub usd_in: String,
    pub output_usd: String,
    pub total_fee_usd: String,
    pub total_price_impact_usd: String,
    pub is_out_of_liquidity: bool,
    pub is_out_of_capacity: bool,
    pub is_stale: bool,
    pub hops: Vec<HopDto>,
}

impl RouteDto {
    pub fn new(path: &CandidatePath, evaluation: &PathEvaluation) -> Self {
        Self {
            pool_ids: path.pool_ids().into_iter().map(String::from).collect(),
            tokens: path.tokens().into_iter().map(String::from).collect(),
            amount_in: evaluation.amount_in.to_string(),
            amount_out: evaluation.amount_out.to_string(),
            usd_in: evaluation.usd_in.to_string(),
            output_usd: evaluation.output_usd.to_string(),
            total_fee_usd: evaluation.total_fee_usd.to_string(),
            total_price_impact_usd: evaluation.total_price_impact_usd.to_string(),
            is_out_of_liquidity: evaluation.is_out_of_liquidity,
            is_out_of_capacity: evaluation.is_out_of_capacity,
            is_stale: evaluation.is_stale,
            hops: evaluation.hops.iter().map(HopDto::from).collect(),
        }
    }
}

/// Best route response; `route` is null unless `status` is `found`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub status: RouteStatus,
    pub source: CandidateSource,
    pub route: Option<RouteDto>,
}

impl From<&RouteDiagnostics> for RouteResponse {
    fn from(diagnostics: &RouteDiagnostics) -> Self {
        Self {
            status: diagnostics.status,
            source: diagnostics.source,
            route: diagnostics
                .best
                .as_ref()
                .map(|best| RouteDto::new(&best.path, &best.evaluation)),
        }
    }
}

/// One ranked candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDto {
    /// Position in enumeration order
    pub index: usize,
    pub rank: usize,
    pub excluded: bool,
    pub route: RouteDto,
}

impl From<&RankedCandidate> for CandidateDto {
    fn from(candidate: &RankedCandidate) -> Self {
        Self {
            index: candidate.index,
            rank: candidate.rank,
            excluded: candidate.excluded,
            route: RouteDto::new(&candidate.path, &candidate.evaluation),
        }
    }
}

/// Every evaluated candidate of a route request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    pub status: RouteStatus,
    pub source: CandidateSource,
    pub from: String,
    pub to: String,
    pub candidates: Vec<CandidateDto>,
    /// Enumeration index of the selected candidate
    pub best_index: Option<usize>,
}

impl From<&RouteDiagnostics> for DiagnosticsResponse {
    fn from(diagnostics: &RouteDiagnostics) -> Self {
        Self {
            status: diagnostics.status,
            source: diagnostics.source,
            from: diagnostics.from.to_string(),
            to: diagnostics.to.to_string(),
            candidates: diagnostics.candidates.iter().map(CandidateDto::from).collect(),
            best_index: diagnostics.best.as_ref().map(|best| best.candidate_index),
        }
    }
}

// =============================================================================
// Markets DTOs
// =============================================================================

/// Market list update response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketsResponse {
    pub network: String,
    pub graph_version: String,
    pub pool_count: usize,
    /// False when the pool list was unchanged and the graph kept
    pub rebuilt: bool,
}
