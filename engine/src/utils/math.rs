//! # Safe String-Decimal Arithmetic
//!
//! All fee and balance amounts move through the engine as decimal strings,
//! because wei amounts routinely exceed `u64` and float arithmetic would
//! corrupt them. This module wraps `bigdecimal` so the rest of the engine
//! never touches floats for money.
//!
//! Functions take and return decimal strings; parse failures and division by
//! zero surface as [`EngineError::Math`](crate::EngineError).

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use std::str::FromStr;

use crate::core::error::{EngineError, Result};

/// Wei per gwei.
const WEI_PER_GWEI: u64 = 1_000_000_000;

pub fn parse(raw: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(raw.trim())
        .map_err(|_| EngineError::Math(format!("not a decimal amount: {raw:?}")))
}

pub fn add(a: &str, b: &str) -> Result<String> {
    Ok((parse(a)? + parse(b)?).normalized().to_plain_string())
}

pub fn sub(a: &str, b: &str) -> Result<String> {
    Ok((parse(a)? - parse(b)?).normalized().to_plain_string())
}

pub fn mul(a: &str, b: &str) -> Result<String> {
    Ok((parse(a)? * parse(b)?).normalized().to_plain_string())
}

pub fn div(a: &str, b: &str) -> Result<String> {
    let divisor = parse(b)?;
    if divisor.is_zero() {
        return Err(EngineError::Math(format!("division by zero: {a} / {b}")));
    }
    Ok((parse(a)? / divisor).normalized().to_plain_string())
}

pub fn lt(a: &str, b: &str) -> Result<bool> {
    Ok(parse(a)? < parse(b)?)
}

pub fn gt(a: &str, b: &str) -> Result<bool> {
    Ok(parse(a)? > parse(b)?)
}

pub fn gte(a: &str, b: &str) -> Result<bool> {
    Ok(parse(a)? >= parse(b)?)
}

pub fn is_zero(a: &str) -> Result<bool> {
    Ok(parse(a)?.is_zero())
}

/// The smaller of two amounts, returned as a string.
pub fn min(a: &str, b: &str) -> Result<String> {
    Ok(if lt(a, b)? { a.to_string() } else { b.to_string() })
}

/// Multiply an amount by a speed or buffer factor, truncating to an integer.
///
/// Used for tier multipliers (1.05, 1.10) and the gas-funds buffer; fee
/// amounts are whole wei, so the product is floored.
pub fn scale_to_wei(amount: &str, factor: &str) -> Result<String> {
    let product = parse(amount)? * parse(factor)?;
    Ok(product.with_scale_round(0, RoundingMode::Floor).to_plain_string())
}

/// Convert a wei amount to gwei, keeping fractional gwei.
pub fn wei_to_gwei(wei: &str) -> Result<String> {
    Ok((parse(wei)? / BigDecimal::from(WEI_PER_GWEI)).normalized().to_plain_string())
}

/// Convert a wei amount to whole gwei, rounded half-up for display.
pub fn wei_to_rounded_gwei(wei: &str) -> Result<String> {
    let gwei = parse(wei)? / BigDecimal::from(WEI_PER_GWEI);
    Ok(gwei.with_scale_round(0, RoundingMode::HalfUp).to_plain_string())
}

/// Convert a gwei amount (possibly fractional) to whole wei.
pub fn gwei_to_wei(gwei: &str) -> Result<String> {
    let wei = parse(gwei)? * BigDecimal::from(WEI_PER_GWEI);
    Ok(wei.with_scale_round(0, RoundingMode::Floor).to_plain_string())
}

/// Convert a raw token amount to its decimal representation.
///
/// `convert_raw_to_decimal("1500000000000000000", 18)` is `"1.5"`.
pub fn convert_raw_to_decimal(raw: &str, decimals: u32) -> Result<String> {
    let divisor = pow10(decimals);
    Ok((parse(raw)? / divisor).normalized().to_plain_string())
}

/// Convert a decimal token amount to raw units, truncating sub-unit dust.
pub fn convert_decimal_to_raw(amount: &str, decimals: u32) -> Result<String> {
    let raw = parse(amount)? * pow10(decimals);
    Ok(raw.with_scale_round(0, RoundingMode::Floor).to_plain_string())
}

/// Value of a raw token amount in the display currency.
///
/// `price` is the display-currency price of one whole token.
pub fn raw_amount_to_display_value(raw: &str, decimals: u32, price: &str) -> Result<String> {
    let value = parse(raw)? / pow10(decimals) * parse(price)?;
    Ok(value.with_scale_round(2, RoundingMode::HalfUp).to_plain_string())
}

fn pow10(decimals: u32) -> BigDecimal {
    BigDecimal::new(1.into(), -i64::from(decimals))
}
