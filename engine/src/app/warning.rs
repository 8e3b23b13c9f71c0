//! # Swap Warnings
//!
//! Price-impact classification and the single prioritized warning the
//! review screen shows. The ordering is fixed: a structured quote error
//! outranks everything, an unpriceable trade outranks impact severities,
//! and the cross-chain long-wait notice only shows when nothing else does.

use shared::{Asset, Quote, QuoteResult, SwapType};

use crate::core::error::Result;
use crate::utils::math;

/// Impact at or above this fraction of input value is severe.
pub const SEVERE_PRICE_IMPACT_THRESHOLD: &str = "0.10";
/// Impact at or above this fraction of input value is high.
pub const HIGH_PRICE_IMPACT_THRESHOLD: &str = "0.05";
/// Cross-chain service times past this show the long-wait notice.
pub const LONG_WAIT_THRESHOLD_SECS: u64 = 600;

/// Severity of the value lost between the form's two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactSeverity {
    None,
    High,
    Severe,
}

/// Pure severity classification over the form's native values.
///
/// Either value missing clears the severity rather than guessing, and an
/// in-flight fetch or an active slider scrub clears it too; transient
/// mid-scrub samples would otherwise flash severe on every frame.
pub fn impact_severity(
    input_native_value: Option<&str>,
    output_native_value: Option<&str>,
    is_fetching: bool,
    scrubbing: bool,
) -> Result<ImpactSeverity> {
    let (Some(input), Some(output)) = (input_native_value, output_native_value) else {
        return Ok(ImpactSeverity::None);
    };
    if is_fetching || scrubbing {
        return Ok(ImpactSeverity::None);
    }
    if math::is_zero(input)? {
        return Ok(ImpactSeverity::None);
    }

    let lost = math::sub(input, output)?;
    if math::lt(&lost, "0")? {
        return Ok(ImpactSeverity::None);
    }
    let impact = math::div(&lost, input)?;

    if math::gte(&impact, SEVERE_PRICE_IMPACT_THRESHOLD)? {
        Ok(ImpactSeverity::Severe)
    } else if math::gte(&impact, HIGH_PRICE_IMPACT_THRESHOLD)? {
        Ok(ImpactSeverity::High)
    } else {
        Ok(ImpactSeverity::None)
    }
}

/// How much value the trade loses between input and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceImpact {
    /// Below the high threshold.
    Negligible,
    /// Lost fraction in `[0.05, 0.10)`, as a decimal string.
    High(String),
    /// Lost fraction at or above `0.10`, as a decimal string.
    Severe(String),
    /// One side has no known price, so impact cannot be computed.
    Unknown,
}

/// The one warning the review screen shows, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapWarning {
    None,
    /// The aggregator returned a structured error instead of a quote.
    QuoteError { code: i64, message: String },
    /// The trade cannot be priced, so impact is unknowable.
    UnknownPrice,
    Severe { impact: String },
    High { impact: String },
    /// Cross-chain settlement will take a while.
    LongWait { secs: u64 },
}

/// Classify the price impact of a quote.
///
/// Wraps and unwraps are 1:1 by construction and always negligible.
pub fn classify_price_impact(
    quote: &Quote,
    sell_asset: &Asset,
    buy_asset: &Asset,
) -> Result<PriceImpact> {
    if matches!(quote.swap_type, SwapType::Wrap | SwapType::Unwrap) {
        return Ok(PriceImpact::Negligible);
    }

    let (Some(sell_price), Some(buy_price)) =
        (sell_asset.native_price.as_deref(), buy_asset.native_price.as_deref())
    else {
        return Ok(PriceImpact::Unknown);
    };

    let sell_value = math::raw_amount_to_display_value(
        &quote.sell_amount,
        sell_asset.decimals,
        sell_price,
    )?;
    let buy_value = math::raw_amount_to_display_value(
        &quote.buy_amount_display,
        buy_asset.decimals,
        buy_price,
    )?;
    if math::is_zero(&sell_value)? {
        return Ok(PriceImpact::Unknown);
    }

    let lost = math::sub(&sell_value, &buy_value)?;
    if math::lt(&lost, "0")? {
        // Output worth more than input, impact is a gain
        return Ok(PriceImpact::Negligible);
    }
    let impact = math::div(&lost, &sell_value)?;

    if math::gte(&impact, SEVERE_PRICE_IMPACT_THRESHOLD)? {
        Ok(PriceImpact::Severe(impact))
    } else if math::gte(&impact, HIGH_PRICE_IMPACT_THRESHOLD)? {
        Ok(PriceImpact::High(impact))
    } else {
        Ok(PriceImpact::Negligible)
    }
}

/// Derive the single displayed warning.
///
/// While the user is scrubbing an amount slider, impact warnings are
/// suppressed; transient mid-scrub amounts would otherwise flash severe
/// warnings on every frame. Quote errors still show.
pub fn derive_warning(
    result: Option<&QuoteResult>,
    impact: Option<&PriceImpact>,
    service_time_secs: Option<u64>,
    scrubbing: bool,
) -> SwapWarning {
    if let Some(err) = result.and_then(|r| r.as_error()) {
        return SwapWarning::QuoteError { code: err.error_code, message: err.message.clone() };
    }

    if !scrubbing {
        match impact {
            Some(PriceImpact::Unknown) => return SwapWarning::UnknownPrice,
            Some(PriceImpact::Severe(impact)) => {
                return SwapWarning::Severe { impact: impact.clone() }
            }
            Some(PriceImpact::High(impact)) => {
                return SwapWarning::High { impact: impact.clone() }
            }
            Some(PriceImpact::Negligible) | None => {}
        }
    }

    if let Some(secs) = service_time_secs {
        if secs > LONG_WAIT_THRESHOLD_SECS {
            return SwapWarning::LongWait { secs };
        }
    }

    SwapWarning::None
}
