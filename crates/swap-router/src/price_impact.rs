//! Swap Price Impact & Fees
//!
//! Per-hop economics of a swap through one pool, all in 30-decimal USD.
//!
//! Impact follows the pool imbalance `|long_usd - short_usd|`: a swap that
//! moves the pool toward balance earns a bonus, one that moves it away pays a
//! penalty, both on a convex curve `factor * diff^exponent`.

use alloy_primitives::{I256, U256};
use router_core::ArithmeticError;
use serde::{Deserialize, Serialize};

use crate::fixed_point::{abs_diff, apply_bps, apply_exponent_factor, apply_factor, to_signed};
use crate::graph::SwapEdge;
use crate::state::{ImpactConfig, PoolUsdState};

/// Simulated result of one hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopEvaluation {
    pub usd_in: U256,
    pub fee_usd: U256,
    /// Positive is a bonus, negative a cost
    pub price_impact_usd: I256,
    pub output_usd: U256,
    /// Output exceeds what the output side can pay
    pub is_out_of_liquidity: bool,
    /// Input would push its side past the pool's deposit ceiling
    pub is_out_of_capacity: bool,
    /// Reserves or prices for the pool were missing
    pub is_stale: bool,
}

impl HopEvaluation {
    fn zero() -> Self {
        Self {
            usd_in: U256::ZERO,
            fee_usd: U256::ZERO,
            price_impact_usd: I256::ZERO,
            output_usd: U256::ZERO,
            is_out_of_liquidity: false,
            is_out_of_capacity: false,
            is_stale: false,
        }
    }

    pub(crate) fn stale(usd_in: U256) -> Self {
        Self {
            usd_in,
            is_out_of_liquidity: true,
            is_stale: true,
            ..Self::zero()
        }
    }
}

/// `factor * diff^exponent`
fn impact_for_diff(diff: U256, factor: U256, exponent: U256) -> Result<U256, ArithmeticError> {
    if factor.is_zero() {
        return Ok(U256::ZERO);
    }
    apply_factor(apply_exponent_factor(diff, exponent)?, factor)
}

/// Signed USD impact of moving `delta_usd` from the output side into the
/// input side.
pub fn swap_price_impact(
    input_pool_usd: U256,
    output_pool_usd: U256,
    delta_usd: U256,
    config: &ImpactConfig,
) -> Result<I256, ArithmeticError> {
    let next_input = input_pool_usd
        .checked_add(delta_usd)
        .ok_or(ArithmeticError::Overflow {
            operation: "swap_price_impact",
        })?;
    let next_output = output_pool_usd.saturating_sub(delta_usd);

    let initial_diff = abs_diff(input_pool_usd, output_pool_usd);
    let next_diff = abs_diff(next_input, next_output);
    let exponent = config.exponent_factor;

    let same_side = (input_pool_usd <= output_pool_usd) == (next_input <= next_output);
    if same_side {
        let improves = next_diff < initial_diff;
        let factor = if improves {
            config.positive_factor
        } else {
            config.negative_factor
        };
        let before = impact_for_diff(initial_diff, factor, exponent)?;
        let after = impact_for_diff(next_diff, factor, exponent)?;
        let magnitude = to_signed(abs_diff(before, after))?;
        Ok(if improves { magnitude } else { -magnitude })
    } else {
        // The swap flips which side is heavier: the old imbalance is
        // credited at the positive factor, the new one charged at the negative.
        let credit = impact_for_diff(initial_diff, config.positive_factor, exponent)?;
        let charge = impact_for_diff(next_diff, config.negative_factor, exponent)?;
        let magnitude = to_signed(abs_diff(credit, charge))?;
        Ok(if credit > charge { magnitude } else { -magnitude })
    }
}

/// Simulate a swap of `usd_in` through `edge`'s pool.
///
/// - a zero notional yields all zeros with no flags, whether or not the pool
///   state is known
/// - `state == None` (missing reserves or prices) marks the hop stale and out
///   of liquidity with zero output
/// - the fee is taken first; impact is computed on the remainder
/// - a cost larger than the remainder clamps output to zero, reporting the
///   impact as `-(usd_in - fee)`
///
/// `output_usd == usd_in - fee_usd + price_impact_usd` holds exactly.
pub fn evaluate_hop(
    edge: &SwapEdge,
    usd_in: U256,
    state: Option<&PoolUsdState>,
    config: &ImpactConfig,
) -> Result<HopEvaluation, ArithmeticError> {
    if usd_in.is_zero() {
        return Ok(HopEvaluation::zero());
    }
    let Some(state) = state else {
        return Ok(HopEvaluation::stale(usd_in));
    };

    let fee_usd = apply_bps(usd_in, config.fee_bps)?.min(usd_in);
    let after_fee = usd_in - fee_usd;

    let input_side = state.side(edge.direction.input_side());
    let output_side = state.side(edge.direction.output_side());

    let mut price_impact_usd =
        swap_price_impact(input_side.pool_usd, output_side.pool_usd, after_fee, config)?;

    let output_usd = if price_impact_usd.is_negative() {
        let cost = price_impact_usd.unsigned_abs();
        if cost >= after_fee {
            price_impact_usd = -to_signed(after_fee)?;
            U256::ZERO
        } else {
            after_fee - cost
        }
    } else {
        after_fee
            .checked_add(price_impact_usd.unsigned_abs())
            .ok_or(ArithmeticError::Overflow {
                operation: "evaluate_hop",
            })?
    };

    let is_out_of_liquidity = output_usd > output_side.available_usd;
    let is_out_of_capacity = match input_side.max_pool_usd {
        Some(max) => input_side.pool_usd.saturating_add(after_fee) > max,
        None => false,
    };

    Ok(HopEvaluation {
        usd_in,
        fee_usd,
        price_impact_usd,
        output_usd,
        is_out_of_liquidity,
        is_out_of_capacity,
        is_stale: false,
    })
}
