//! Router Constants
//!
//! Fixed-point scales and default market parameters.

/// Fixed-point scales
pub mod precision {
    use alloy_primitives::U256;

    /// 10^30, the scale of USD values, prices and factors
    pub const FLOAT_PRECISION: U256 =
        U256::from_limbs([5_076_944_270_305_263_616, 54_210_108_624, 0, 0]);

    /// Divisor for basis-point fee rates
    pub const BASIS_POINTS_DIVISOR: u64 = router_core::constants::BASIS_POINTS_DIVISOR;

    /// Binary digits of a fractional exponent that are resolved by square roots
    pub const MAX_ROOT_STEPS: usize = 64;
}

/// Default swap impact parameters (30-decimal factors)
pub mod impact {
    use alloy_primitives::U256;

    /// Quadratic impact curve (2.0)
    pub const DEFAULT_EXPONENT_FACTOR: U256 =
        U256::from_limbs([10_153_888_540_610_527_232, 108_420_217_248, 0, 0]);

    /// 5e-10 per squared USD of imbalance reduced
    pub const DEFAULT_POSITIVE_FACTOR: U256 = U256::from_limbs([1_937_910_009_842_106_368, 27, 0, 0]);

    /// 1e-9 per squared USD of imbalance added
    pub const DEFAULT_NEGATIVE_FACTOR: U256 = U256::from_limbs([3_875_820_019_684_212_736, 54, 0, 0]);
}

/// Fee constants
pub mod fees {
    /// Default swap fee (0.05%)
    pub const DEFAULT_SWAP_FEE_BPS: u32 = 5;
}

/// Precomputed route artifact constants
pub mod artifact {
    /// Current artifact layout version
    pub const FORMAT_VERSION: u32 = 1;

    /// Separator between the two token addresses of a pair key
    pub const PAIR_KEY_SEPARATOR: char = ':';
}
