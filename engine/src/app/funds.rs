//! # Gas Funds Checks
//!
//! Whether the account's native balance covers the estimated network fee,
//! with headroom for the fee moving between quote and submission. The same
//! buffer bounds the maximum swappable amount when the user sells the
//! native asset itself.

use crate::core::error::Result;
use crate::utils::math;

/// Headroom on top of the estimated fee: the fee may grow by half again
/// between estimation and inclusion.
pub const GAS_FEE_BUFFER_RATIO: &str = "0.5";

fn buffered_fee(total_fee_wei: &str) -> Result<String> {
    let headroom = math::scale_to_wei(total_fee_wei, GAS_FEE_BUFFER_RATIO)?;
    math::add(total_fee_wei, &headroom)
}

/// Whether `native_balance_wei` covers the fee plus its headroom.
pub fn has_enough_for_gas(native_balance_wei: &str, total_fee_wei: &str) -> Result<bool> {
    math::gte(native_balance_wei, &buffered_fee(total_fee_wei)?)
}

/// The largest native amount that can go into the swap while still leaving
/// the buffered fee behind, in wei. Zero when the balance cannot cover the
/// fee at all.
pub fn max_swappable_native_wei(native_balance_wei: &str, total_fee_wei: &str) -> Result<String> {
    let reserved = buffered_fee(total_fee_wei)?;
    if math::lt(native_balance_wei, &reserved)? {
        return Ok("0".to_string());
    }
    math::sub(native_balance_wei, &reserved)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1 ETH balance, 0.01 ETH fee
    const BALANCE: &str = "1000000000000000000";
    const FEE: &str = "10000000000000000";

    #[test]
    fn test_enough_with_headroom() {
        assert!(has_enough_for_gas(BALANCE, FEE).unwrap());
        // Balance exactly at fee * 1.5 still passes
        assert!(has_enough_for_gas("15000000000000000", FEE).unwrap());
        // One wei under does not
        assert!(!has_enough_for_gas("14999999999999999", FEE).unwrap());
    }

    #[test]
    fn test_max_swappable_reserves_buffered_fee() {
        let max = max_swappable_native_wei(BALANCE, FEE).unwrap();
        assert_eq!(max, "985000000000000000");
    }

    #[test]
    fn test_max_swappable_floors_at_zero() {
        assert_eq!(max_swappable_native_wei("1000", FEE).unwrap(), "0");
    }
}
