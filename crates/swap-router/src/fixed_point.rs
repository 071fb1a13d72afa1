//! Fixed-Point Arithmetic
//!
//! Integer math over 256-bit amounts with explicit decimal scaling.
//! Intermediates are computed in `BigUint`, so products never overflow before
//! the division. Every division truncates (floor for unsigned values, toward
//! zero for signed ones), which is what settlement does on-chain.

use alloy_primitives::{I256, U256};
use num_bigint::BigUint;
use router_core::ArithmeticError;

use crate::constants::precision::{BASIS_POINTS_DIVISOR, FLOAT_PRECISION, MAX_ROOT_STEPS};

fn to_big(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes::<32>())
}

fn from_big(value: BigUint, operation: &'static str) -> Result<U256, ArithmeticError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(ArithmeticError::Overflow { operation });
    }
    Ok(U256::from_be_slice(&bytes))
}

/// `a * b / denominator`, truncated.
///
/// Errors with `DivisionByZero` on a zero denominator and `Overflow` when the
/// quotient does not fit 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, ArithmeticError> {
    if denominator.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    if a.is_zero() || b.is_zero() {
        return Ok(U256::ZERO);
    }

    let result = to_big(a) * to_big(b) / to_big(denominator);
    from_big(result, "mul_div")
}

/// Signed `a * b / denominator`, truncated toward zero.
pub fn mul_div_signed(a: I256, b: U256, denominator: U256) -> Result<I256, ArithmeticError> {
    let magnitude = to_signed(mul_div(a.unsigned_abs(), b, denominator)?)?;
    Ok(if a.is_negative() { -magnitude } else { magnitude })
}

/// Reinterpret an unsigned value as signed, failing above `I256::MAX`.
pub fn to_signed(value: U256) -> Result<I256, ArithmeticError> {
    I256::try_from(value).map_err(|_| ArithmeticError::Overflow {
        operation: "to_signed",
    })
}

/// `|a - b|`
pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// `10^decimals`
pub fn pow10(decimals: u8) -> Result<U256, ArithmeticError> {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or(ArithmeticError::Overflow { operation: "pow10" })
}

/// `n * 10^decimals`
pub fn expand_decimals(n: u64, decimals: u8) -> Result<U256, ArithmeticError> {
    U256::from(n)
        .checked_mul(pow10(decimals)?)
        .ok_or(ArithmeticError::Overflow {
            operation: "expand_decimals",
        })
}

/// Apply a 30-decimal factor: `value * factor / 10^30`, truncated.
pub fn apply_factor(value: U256, factor: U256) -> Result<U256, ArithmeticError> {
    mul_div(value, factor, FLOAT_PRECISION)
}

/// Apply a basis-point rate: `value * bps / 10_000`, truncated.
pub fn apply_bps(value: U256, bps: u32) -> Result<U256, ArithmeticError> {
    mul_div(value, U256::from(bps), U256::from(BASIS_POINTS_DIVISOR))
}

/// Token amount to 30-decimal USD: `amount * price / 10^decimals`, truncated.
///
/// `price` is the 30-decimal USD value of one whole token.
pub fn convert_to_usd(amount: U256, token_decimals: u8, price: U256) -> Result<U256, ArithmeticError> {
    mul_div(amount, price, pow10(token_decimals)?)
}

/// 30-decimal USD to token units: `usd * 10^decimals / price`, truncated.
///
/// A zero price is a `DivisionByZero`, even for a zero `usd`.
pub fn convert_to_token_amount(
    usd: U256,
    token_decimals: u8,
    price: U256,
) -> Result<U256, ArithmeticError> {
    if price.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    mul_div(usd, pow10(token_decimals)?, price)
}

/// Fixed-point square root of a 30-decimal value, truncated.
fn sqrt_fixed(value: U256) -> Result<U256, ArithmeticError> {
    from_big((to_big(value) * to_big(FLOAT_PRECISION)).sqrt(), "sqrt_fixed")
}

/// `base ^ exponent` for a 30-decimal `base` and an integral `exponent`.
///
/// Square-and-multiply; each product is truncated back to 30 decimals.
fn pow_fixed(base: U256, exponent: U256) -> Result<U256, ArithmeticError> {
    let mut result = FLOAT_PRECISION;
    let mut base = base;
    let mut exponent = exponent;

    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = mul_div(result, base, FLOAT_PRECISION)?;
        }
        exponent >>= 1usize;
        if !exponent.is_zero() {
            base = mul_div(base, base, FLOAT_PRECISION)?;
        }
    }

    Ok(result)
}

/// Raise a 30-decimal `value` to a 30-decimal `exponent`.
///
/// - values below 1.0 yield zero (sub-dollar imbalances carry no impact)
/// - an exponent of exactly 1.0 returns `value` untouched
/// - the integral part of the exponent uses square-and-multiply
/// - the fractional part is expanded in binary: for each set bit
///   `2^-k` the k-th repeated square root of `value` is multiplied in
///
/// Every intermediate truncates, so results never exceed the exact power.
pub fn apply_exponent_factor(value: U256, exponent: U256) -> Result<U256, ArithmeticError> {
    if value < FLOAT_PRECISION {
        return Ok(U256::ZERO);
    }
    if exponent == FLOAT_PRECISION {
        return Ok(value);
    }

    let whole = exponent / FLOAT_PRECISION;
    let mut fraction = exponent % FLOAT_PRECISION;
    let mut result = pow_fixed(value, whole)?;

    let mut root = value;
    let mut bit = FLOAT_PRECISION >> 1usize;
    for _ in 0..MAX_ROOT_STEPS {
        if fraction.is_zero() || bit.is_zero() {
            break;
        }
        root = sqrt_fixed(root)?;
        if fraction >= bit {
            result = mul_div(result, root, FLOAT_PRECISION)?;
            fraction -= bit;
        }
        bit >>= 1usize;
    }

    Ok(result)
}

/// Whole-dollar helper: `usd * 10^30`
pub fn usd(dollars: u64) -> U256 {
    U256::from(dollars) * FLOAT_PRECISION
}
