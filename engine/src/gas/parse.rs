//! # Fee Parameter Parsing
//!
//! Turns raw oracle payloads into per-speed [`GasFeeParams`], including the
//! confirmation-time ladder, the gwei display strings, and the total-fee
//! estimate the review screen shows.
//!
//! All arithmetic goes through [`crate::utils::math`]; wei amounts never
//! touch floats.

use shared::utils::format_time_estimate;
use shared::{
    ChainId, Eip1559FeeData, Eip1559Params, EstimatedTime, FeeOracleData, FeeValue, GasFeeParams,
    GasFeeParamsBySpeed, GasSpeed, LegacyFeeData, LegacyParams, TotalFee,
};

use crate::core::error::{EngineError, Result};
use crate::utils::math;

/// Tier multipliers applied to the oracle's base-fee suggestion.
fn speed_multiplier(speed: GasSpeed) -> &'static str {
    match speed {
        GasSpeed::Normal => "1",
        GasSpeed::Fast => "1.05",
        GasSpeed::Urgent | GasSpeed::Custom => "1.1",
    }
}

/// Private-mempool relays ignore tips below this floor (wei).
pub const FLASHBOTS_MIN_TIP_WEI: &str = "6000000000";

/// Everything fee parsing needs beyond the oracle payload itself.
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    pub chain_id: ChainId,
    /// Gas limit in gas units, decimal string.
    pub gas_limit: &'a str,
    /// Display-currency price of one whole native token, when known.
    pub native_price: Option<&'a str>,
    pub native_symbol: &'a str,
    /// OP-stack L1 data-posting fee in wei, when applicable.
    pub l1_security_fee: Option<&'a str>,
    /// Whether the transaction routes through a private mempool.
    pub flashbots: bool,
}

/// Parse a full per-speed parameter set from an oracle payload.
pub fn parse_fee_params_by_speed(
    data: &FeeOracleData,
    ctx: &ParseContext<'_>,
) -> Result<GasFeeParamsBySpeed> {
    match data {
        FeeOracleData::Eip1559(eip) => Ok(GasFeeParamsBySpeed {
            normal: parse_eip1559_params(eip, GasSpeed::Normal, ctx)?,
            fast: parse_eip1559_params(eip, GasSpeed::Fast, ctx)?,
            urgent: parse_eip1559_params(eip, GasSpeed::Urgent, ctx)?,
            custom: None,
        }),
        FeeOracleData::Legacy { legacy } => Ok(GasFeeParamsBySpeed {
            normal: parse_legacy_params(legacy, GasSpeed::Normal, ctx)?,
            fast: parse_legacy_params(legacy, GasSpeed::Fast, ctx)?,
            urgent: parse_legacy_params(legacy, GasSpeed::Urgent, ctx)?,
            custom: None,
        }),
    }
}

/// Parse one speed tier on an EIP-1559 chain.
pub fn parse_eip1559_params(
    data: &Eip1559FeeData,
    speed: GasSpeed,
    ctx: &ParseContext<'_>,
) -> Result<GasFeeParams> {
    let max_base_fee = math::scale_to_wei(&data.base_fee_suggestion, speed_multiplier(speed))?;

    let mut max_priority_fee =
        data.max_priority_fee_suggestions.for_speed(speed).to_string();
    if ctx.flashbots && math::lt(&max_priority_fee, FLASHBOTS_MIN_TIP_WEI)? {
        max_priority_fee = FLASHBOTS_MIN_TIP_WEI.to_string();
    }

    build_eip1559_params(data, speed, &max_base_fee, &max_priority_fee, ctx)
}

/// Parse user-entered custom fees (whole or fractional gwei) into a full
/// parameter set, priced against the current oracle snapshot.
pub fn parse_custom_params(
    data: &Eip1559FeeData,
    max_base_fee_gwei: &str,
    max_priority_fee_gwei: &str,
    ctx: &ParseContext<'_>,
) -> Result<GasFeeParams> {
    let max_base_fee = math::gwei_to_wei(max_base_fee_gwei)?;
    let max_priority_fee = math::gwei_to_wei(max_priority_fee_gwei)?;
    build_eip1559_params(data, GasSpeed::Custom, &max_base_fee, &max_priority_fee, ctx)
}

fn build_eip1559_params(
    data: &Eip1559FeeData,
    speed: GasSpeed,
    max_base_fee: &str,
    max_priority_fee: &str,
    ctx: &ParseContext<'_>,
) -> Result<GasFeeParams> {
    // The likely fee uses whichever of current and max base fee is lower,
    // since the max is a ceiling rather than a prediction
    let likely_base = math::min(&data.current_base_fee, max_base_fee)?;
    let low_gwei = math::wei_to_rounded_gwei(&math::add(&likely_base, max_priority_fee)?)?;
    let high_gwei = math::wei_to_rounded_gwei(&math::add(max_base_fee, max_priority_fee)?)?;
    let display = if low_gwei == high_gwei {
        format!("{high_gwei} Gwei")
    } else {
        format!("{low_gwei} - {high_gwei} Gwei")
    };

    let estimated_time = estimate_confirmation_time(data, max_base_fee, max_priority_fee)?;
    let max_fee_per_gas = math::add(max_base_fee, max_priority_fee)?;
    let gas_fee = total_fee(&max_fee_per_gas, ctx)?;

    Ok(GasFeeParams::Eip1559(Eip1559Params {
        speed,
        max_base_fee: fee_value(max_base_fee)?,
        max_priority_fee: fee_value(max_priority_fee)?,
        display,
        estimated_time,
        gas_fee,
    }))
}

/// Parse one speed tier on a legacy chain.
pub fn parse_legacy_params(
    data: &LegacyFeeData,
    speed: GasSpeed,
    ctx: &ParseContext<'_>,
) -> Result<GasFeeParams> {
    let wait_times = ctx.chain_id.wait_times();
    let (gas_price_gwei, wait_secs) = match speed {
        GasSpeed::Normal => (&data.safe_gas_price, wait_times.map(|w| w.safe)),
        GasSpeed::Fast => (&data.propose_gas_price, wait_times.map(|w| w.proposed)),
        GasSpeed::Urgent | GasSpeed::Custom => {
            (&data.fast_gas_price, wait_times.map(|w| w.fast))
        }
    };

    let gas_price = math::gwei_to_wei(gas_price_gwei)?;
    let estimated_time = match wait_secs {
        Some(secs) => EstimatedTime { secs, display: format_time_estimate(secs) },
        None => EstimatedTime { secs: 0, display: String::new() },
    };

    Ok(GasFeeParams::Legacy(LegacyParams {
        speed,
        display: format!("{} Gwei", math::wei_to_rounded_gwei(&gas_price)?),
        gas_price: fee_value(&gas_price)?,
        estimated_time,
        gas_fee: total_fee(&gas_price, ctx)?,
    }))
}

/// Confirmation-time ladder.
///
/// The oracle publishes fee thresholds keyed by block counts; the base fee
/// picks the rung and the priority fee adds a penalty on top unless the
/// base fee already sits on the slowest rung.
fn estimate_confirmation_time(
    data: &Eip1559FeeData,
    max_base_fee: &str,
    max_priority_fee: &str,
) -> Result<EstimatedTime> {
    let by_base = &data.blocks_to_confirmation_by_base_fee;
    let base_blocks = if math::lt(&by_base.in_4, max_base_fee)? {
        1
    } else if math::lt(&by_base.in_8, max_base_fee)? {
        4
    } else if math::lt(&by_base.in_40, max_base_fee)? {
        8
    } else if math::lt(&by_base.in_120, max_base_fee)? {
        40
    } else if math::lt(&by_base.in_240, max_base_fee)? {
        120
    } else {
        240
    };

    let by_priority = &data.blocks_to_confirmation_by_priority_fee;
    let half_of_slowest = math::div(&by_priority.in_4, "2")?;
    let priority_blocks = if math::lt(max_priority_fee, &half_of_slowest)? {
        240
    } else if math::lt(max_priority_fee, &by_priority.in_4)? {
        4
    } else if math::lt(max_priority_fee, &by_priority.in_3)? {
        3
    } else if math::lt(max_priority_fee, &by_priority.in_2)? {
        2
    } else if math::lt(max_priority_fee, &by_priority.in_1)? {
        1
    } else {
        0
    };

    let total_blocks =
        base_blocks + if base_blocks < 240 { priority_blocks } else { 0 };
    let secs = data.seconds_per_new_block * total_blocks;
    Ok(EstimatedTime { secs, display: format_time_estimate(secs) })
}

/// Total fee at a given max fee per gas: `fee_per_gas * gas_limit` plus any
/// L1 data-posting surcharge.
fn total_fee(max_fee_per_gas: &str, ctx: &ParseContext<'_>) -> Result<TotalFee> {
    let mut amount = math::mul(max_fee_per_gas, ctx.gas_limit)?;
    if let Some(l1_fee) = ctx.l1_security_fee {
        amount = math::add(&amount, l1_fee)?;
    }

    let decimals = ctx.chain_id.native_asset_decimals();
    let display = match ctx.native_price {
        Some(price) => {
            format!("${}", math::raw_amount_to_display_value(&amount, decimals, price)?)
        }
        // No price known for the native asset, fall back to raw units
        None => {
            format!("{} {}", math::convert_raw_to_decimal(&amount, decimals)?, ctx.native_symbol)
        }
    };

    Ok(TotalFee { amount, display })
}

fn fee_value(wei: &str) -> Result<FeeValue> {
    if math::lt(wei, "0")? {
        return Err(EngineError::Math(format!("negative fee amount: {wei}")));
    }
    let gwei = math::wei_to_rounded_gwei(wei)?;
    Ok(FeeValue {
        amount: wei.to_string(),
        display: format!("{gwei} Gwei"),
        gwei,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{BlocksByBaseFee, BlocksByPriorityFee, PriorityFeeSuggestions};

    fn oracle_snapshot() -> Eip1559FeeData {
        Eip1559FeeData {
            current_base_fee: "14000000000".to_string(),
            base_fee_suggestion: "16000000000".to_string(),
            base_fee_trend: 0,
            seconds_per_new_block: 12,
            max_priority_fee_suggestions: PriorityFeeSuggestions {
                normal: "1000000000".to_string(),
                fast: "1500000000".to_string(),
                urgent: "2000000000".to_string(),
            },
            blocks_to_confirmation_by_base_fee: BlocksByBaseFee {
                in_4: "15000000000".to_string(),
                in_8: "14500000000".to_string(),
                in_40: "14000000000".to_string(),
                in_120: "13500000000".to_string(),
                in_240: "13000000000".to_string(),
            },
            blocks_to_confirmation_by_priority_fee: BlocksByPriorityFee {
                in_1: "2000000000".to_string(),
                in_2: "1500000000".to_string(),
                in_3: "1000000000".to_string(),
                in_4: "500000000".to_string(),
            },
        }
    }

    fn mainnet_ctx(gas_limit: &'static str) -> ParseContext<'static> {
        ParseContext {
            chain_id: ChainId::MAINNET,
            gas_limit,
            native_price: None,
            native_symbol: "ETH",
            l1_security_fee: None,
            flashbots: false,
        }
    }

    #[test]
    fn test_speed_multipliers_applied() {
        let data = oracle_snapshot();
        let ctx = mainnet_ctx("100000");

        let normal = parse_eip1559_params(&data, GasSpeed::Normal, &ctx).unwrap();
        let fast = parse_eip1559_params(&data, GasSpeed::Fast, &ctx).unwrap();
        let urgent = parse_eip1559_params(&data, GasSpeed::Urgent, &ctx).unwrap();

        let base = |p: &GasFeeParams| match p {
            GasFeeParams::Eip1559(p) => p.max_base_fee.amount.clone(),
            _ => panic!("expected eip1559 params"),
        };
        assert_eq!(base(&normal), "16000000000");
        assert_eq!(base(&fast), "16800000000");
        assert_eq!(base(&urgent), "17600000000");
    }

    #[test]
    fn test_flashbots_floor_raises_low_tips() {
        let data = oracle_snapshot();
        let ctx = ParseContext { flashbots: true, ..mainnet_ctx("100000") };

        let fast = parse_eip1559_params(&data, GasSpeed::Fast, &ctx).unwrap();
        match fast {
            GasFeeParams::Eip1559(p) => {
                assert_eq!(p.max_priority_fee.amount, FLASHBOTS_MIN_TIP_WEI)
            }
            _ => panic!("expected eip1559 params"),
        }
    }

    #[test]
    fn test_display_range_uses_lower_of_current_and_max() {
        let data = oracle_snapshot();
        let ctx = mainnet_ctx("100000");

        // current 14 gwei < max 16 gwei, priority 1 gwei: 15 - 17
        let normal = parse_eip1559_params(&data, GasSpeed::Normal, &ctx).unwrap();
        match normal {
            GasFeeParams::Eip1559(p) => assert_eq!(p.display, "15 - 17 Gwei"),
            _ => panic!("expected eip1559 params"),
        }
    }

    #[test]
    fn test_confirmation_ladder() {
        let data = oracle_snapshot();
        // base 16 gwei > in_4 threshold 15 gwei: 1 block; priority 1.4 gwei
        // sits below the 2-block threshold, adding 2 blocks. (1 + 2) * 12s
        let time = estimate_confirmation_time(&data, "16000000000", "1400000000").unwrap();
        assert_eq!(time.secs, 36);
        assert_eq!(time.display, "~ 36 sec");
    }

    #[test]
    fn test_slowest_rung_ignores_priority_penalty() {
        let data = oracle_snapshot();
        // base fee below every threshold: 240 blocks, priority penalty dropped
        let time = estimate_confirmation_time(&data, "1000000000", "1").unwrap();
        assert_eq!(time.secs, 240 * 12);
        assert_eq!(time.display, "~ 48 min");
    }

    #[test]
    fn test_total_fee_includes_l1_surcharge() {
        let data = oracle_snapshot();
        let ctx = ParseContext {
            chain_id: ChainId::OPTIMISM,
            l1_security_fee: Some("500000000000000"),
            ..mainnet_ctx("100000")
        };
        let normal = parse_eip1559_params(&data, GasSpeed::Normal, &ctx).unwrap();
        // (16 + 1) gwei * 100000 = 1700000000000000, plus the L1 fee
        assert_eq!(normal.gas_fee().amount, "2200000000000000");
    }

    #[test]
    fn test_fee_display_falls_back_to_raw_units() {
        let data = oracle_snapshot();
        let no_price = mainnet_ctx("100000");
        let normal = parse_eip1559_params(&data, GasSpeed::Normal, &no_price).unwrap();
        assert_eq!(normal.gas_fee().display, "0.0017 ETH");

        let with_price = ParseContext { native_price: Some("3000"), ..no_price };
        let normal = parse_eip1559_params(&data, GasSpeed::Normal, &with_price).unwrap();
        assert_eq!(normal.gas_fee().display, "$5.10");
    }

    #[test]
    fn test_custom_params_priced_from_gwei_input() {
        let data = oracle_snapshot();
        let ctx = mainnet_ctx("100000");
        let custom = parse_custom_params(&data, "20", "1.5", &ctx).unwrap();
        match custom {
            GasFeeParams::Eip1559(p) => {
                assert_eq!(p.speed, GasSpeed::Custom);
                assert_eq!(p.max_base_fee.amount, "20000000000");
                assert_eq!(p.max_priority_fee.amount, "1500000000");
                // current base 14 gwei is the likely bound: 16 - 22
                assert_eq!(p.display, "16 - 22 Gwei");
            }
            _ => panic!("expected eip1559 params"),
        }
    }

    #[test]
    fn test_legacy_parsing_maps_speed_table() {
        let data = LegacyFeeData {
            safe_gas_price: "3".to_string(),
            propose_gas_price: "5".to_string(),
            fast_gas_price: "8".to_string(),
        };
        let ctx = ParseContext { chain_id: ChainId::BSC, ..mainnet_ctx("200000") };

        let by_speed =
            parse_fee_params_by_speed(&FeeOracleData::Legacy { legacy: data }, &ctx).unwrap();
        match by_speed.get(GasSpeed::Normal) {
            GasFeeParams::Legacy(p) => {
                assert_eq!(p.gas_price.amount, "3000000000");
                assert_eq!(p.estimated_time.secs, 6);
            }
            _ => panic!("expected legacy params"),
        }
        match by_speed.get(GasSpeed::Urgent) {
            GasFeeParams::Legacy(p) => {
                assert_eq!(p.gas_price.amount, "8000000000");
                assert_eq!(p.gas_fee.amount, "1600000000000000");
            }
            _ => panic!("expected legacy params"),
        }
    }
}
