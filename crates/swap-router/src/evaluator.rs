//! Path Evaluation & Best-Path Selection
//!
//! Simulates candidate paths hop by hop against a market snapshot and ranks
//! them. Between hops the output is settled in the intermediate token: USD is
//! converted to token units at the max price (truncating) and back to USD at
//! the min price for the next hop, as the on-chain swap router does.

use std::cmp::Ordering;

use alloy_primitives::{I256, U256};
use router_core::{ArithmeticError, PoolId, RouterConfig, TokenAddress};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fixed_point::{convert_to_token_amount, convert_to_usd};
use crate::graph::{MarketGraph, SwapEdge};
use crate::paths::CandidatePath;
use crate::price_impact::{evaluate_hop, HopEvaluation};
use crate::state::{MarketSnapshot, PoolUsdState, TokenRegistry};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Read-only inputs shared by every evaluation of one request.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub graph: &'a MarketGraph,
    pub registry: &'a TokenRegistry,
    pub snapshot: &'a MarketSnapshot,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(graph: &'a MarketGraph, registry: &'a TokenRegistry, snapshot: &'a MarketSnapshot) -> Self {
        Self {
            graph,
            registry,
            snapshot,
        }
    }

    fn pool_state(&self, pool_id: &PoolId) -> Result<Option<PoolUsdState>, ArithmeticError> {
        match self.graph.pool(pool_id) {
            Some(pool) => self.snapshot.pool_usd_state(pool, self.registry),
            None => Ok(None),
        }
    }

    /// Whole-token decimals and price of `token`, if both are known
    fn token_terms(&self, token: &TokenAddress) -> Option<(u8, U256, U256)> {
        let decimals = self.registry.get(token)?.decimals;
        let price = self.snapshot.prices.get(token)?;
        Some((decimals, price.min, price.max))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOptions {
    /// Keep candidates that fail liquidity or capacity checks, ranked last
    #[serde(default)]
    pub include_insufficient: bool,
}

impl SelectorOptions {
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            include_insufficient: config.include_insufficient,
        }
    }
}

/// One simulated hop with its token amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathHop {
    pub pool_id: PoolId,
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
    pub amount_in: U256,
    pub amount_out: U256,
    #[serde(flatten)]
    pub evaluation: HopEvaluation,
}

/// Simulated economics of a whole path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEvaluation {
    pub amount_in: U256,
    pub amount_out: U256,
    pub usd_in: U256,
    /// USD value delivered by the final hop
    pub output_usd: U256,
    pub total_fee_usd: U256,
    pub total_price_impact_usd: I256,
    pub hops: Vec<PathHop>,
    pub is_out_of_liquidity: bool,
    pub is_out_of_capacity: bool,
    pub is_stale: bool,
}

impl PathEvaluation {
    /// Passes every liquidity and capacity check
    pub fn is_sufficient(&self) -> bool {
        !self.is_out_of_liquidity && !self.is_out_of_capacity
    }
}

/// A candidate with its evaluation and position in the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Position in the enumerated candidate list
    pub index: usize,
    /// Position after ranking (0 is best)
    pub rank: usize,
    pub path: CandidatePath,
    pub evaluation: PathEvaluation,
    /// Dropped by the selector under the current options
    pub excluded: bool,
}

/// The selected path for a requested input amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRoute {
    pub path: CandidatePath,
    pub evaluation: PathEvaluation,
    pub candidate_index: usize,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn settle_between_hops(
    ctx: &EvaluationContext<'_>,
    edge: &SwapEdge,
    output_usd: U256,
) -> Result<(U256, U256), ArithmeticError> {
    let Some((decimals, min, max)) = ctx.token_terms(&edge.to) else {
        return Ok((U256::ZERO, U256::ZERO));
    };
    let amount = convert_to_token_amount(output_usd, decimals, max)?;
    let usd = convert_to_usd(amount, decimals, min)?;
    Ok((amount, usd))
}

/// Simulate `amount_in` of the path's source token through every hop.
///
/// Missing reserves or prices never fail the call: the affected hop comes
/// back stale and out of liquidity. Only arithmetic faults are errors.
pub fn evaluate_path(
    path: &CandidatePath,
    amount_in: U256,
    ctx: &EvaluationContext<'_>,
) -> Result<PathEvaluation, ArithmeticError> {
    let source_terms = path.from_token().and_then(|t| ctx.token_terms(t));
    let mut usd = match source_terms {
        Some((decimals, min, _)) => convert_to_usd(amount_in, decimals, min)?,
        None => U256::ZERO,
    };

    let mut evaluation = PathEvaluation {
        amount_in,
        amount_out: U256::ZERO,
        usd_in: usd,
        output_usd: U256::ZERO,
        total_fee_usd: U256::ZERO,
        total_price_impact_usd: I256::ZERO,
        hops: Vec::with_capacity(path.hop_count()),
        is_out_of_liquidity: false,
        is_out_of_capacity: false,
        is_stale: false,
    };
    let mut amount = amount_in;

    for (i, edge) in path.edges().iter().enumerate() {
        // An unpriced source reads as zero USD; a real input must still flag stale.
        let hop = if i == 0 && source_terms.is_none() && !amount_in.is_zero() {
            HopEvaluation::stale(usd)
        } else {
            let state = ctx.pool_state(&edge.pool_id)?;
            let config = ctx.snapshot.impact.for_pool(&edge.pool_id);
            evaluate_hop(edge, usd, state.as_ref(), config)?
        };

        let (amount_out, next_usd) = settle_between_hops(ctx, edge, hop.output_usd)?;

        evaluation.total_fee_usd = evaluation
            .total_fee_usd
            .checked_add(hop.fee_usd)
            .ok_or(ArithmeticError::Overflow {
                operation: "evaluate_path",
            })?;
        evaluation.total_price_impact_usd = evaluation
            .total_price_impact_usd
            .checked_add(hop.price_impact_usd)
            .ok_or(ArithmeticError::Overflow {
                operation: "evaluate_path",
            })?;
        evaluation.is_out_of_liquidity |= hop.is_out_of_liquidity;
        evaluation.is_out_of_capacity |= hop.is_out_of_capacity;
        evaluation.is_stale |= hop.is_stale;
        evaluation.output_usd = hop.output_usd;

        evaluation.hops.push(PathHop {
            pool_id: edge.pool_id.clone(),
            token_in: edge.from.clone(),
            token_out: edge.to.clone(),
            amount_in: amount,
            amount_out,
            evaluation: hop,
        });

        amount = amount_out;
        usd = next_usd;
    }

    evaluation.amount_out = amount;
    Ok(evaluation)
}

/// Best first: sufficient before insufficient, then greatest output USD,
/// fewest hops, smallest absolute impact, enumeration order.
fn compare_candidates(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    let ea = &a.evaluation;
    let eb = &b.evaluation;
    eb.is_sufficient()
        .cmp(&ea.is_sufficient())
        .then_with(|| eb.output_usd.cmp(&ea.output_usd))
        .then_with(|| a.path.hop_count().cmp(&b.path.hop_count()))
        .then_with(|| {
            ea.total_price_impact_usd
                .unsigned_abs()
                .cmp(&eb.total_price_impact_usd.unsigned_abs())
        })
        .then_with(|| a.index.cmp(&b.index))
}

/// Evaluate and rank every candidate, excluded ones included.
pub fn evaluate_candidates(
    candidates: &[CandidatePath],
    amount_in: U256,
    ctx: &EvaluationContext<'_>,
    options: &SelectorOptions,
) -> Result<Vec<RankedCandidate>, ArithmeticError> {
    let mut ranked = candidates
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let evaluation = evaluate_path(path, amount_in, ctx)?;
            let excluded = !evaluation.is_sufficient() && !options.include_insufficient;
            Ok(RankedCandidate {
                index,
                rank: 0,
                path: path.clone(),
                evaluation,
                excluded,
            })
        })
        .collect::<Result<Vec<_>, ArithmeticError>>()?;

    ranked.sort_by(compare_candidates);
    for (rank, candidate) in ranked.iter_mut().enumerate() {
        candidate.rank = rank;
    }
    Ok(ranked)
}

/// Pick the economically best candidate.
///
/// `None` when every candidate is excluded (or there are none). Identical
/// inputs always select the same path.
pub fn select_best_path(
    candidates: &[CandidatePath],
    amount_in: U256,
    ctx: &EvaluationContext<'_>,
    options: &SelectorOptions,
) -> Result<Option<BestRoute>, ArithmeticError> {
    let ranked = evaluate_candidates(candidates, amount_in, ctx, options)?;
    let excluded = ranked.iter().filter(|c| c.excluded).count();

    let best = ranked.into_iter().find(|c| !c.excluded).map(|c| BestRoute {
        path: c.path,
        evaluation: c.evaluation,
        candidate_index: c.index,
    });

    debug!(
        candidates = candidates.len(),
        excluded,
        selected = best.as_ref().map(|b| b.candidate_index),
        "Selected best path"
    );
    Ok(best)
}

/// Smallest output-side available liquidity along the path, in USD.
///
/// `None` when any pool on the path lacks reserves or prices.
pub fn max_path_liquidity_usd(
    path: &CandidatePath,
    ctx: &EvaluationContext<'_>,
) -> Result<Option<U256>, ArithmeticError> {
    let mut liquidity: Option<U256> = None;
    for edge in path.edges() {
        let Some(state) = ctx.pool_state(&edge.pool_id)? else {
            return Ok(None);
        };
        let available = state.side(edge.direction.output_side()).available_usd;
        liquidity = Some(liquidity.map_or(available, |current| current.min(available)));
    }
    Ok(liquidity)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
