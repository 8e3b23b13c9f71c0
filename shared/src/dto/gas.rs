//! # Gas Fee Types
//!
//! Gas speeds, per-speed fee parameter sets, and the raw fee-oracle response
//! shapes. Fee amounts are decimal strings in wei unless a field says
//! otherwise; the engine's safe-math layer owns all arithmetic on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction speed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasSpeed {
    Normal,
    Fast,
    Urgent,
    Custom,
}

impl GasSpeed {
    /// Suggested speeds in selector order (excludes `Custom`).
    pub fn suggested() -> &'static [GasSpeed] {
        &[GasSpeed::Normal, GasSpeed::Fast, GasSpeed::Urgent]
    }
}

impl fmt::Display for GasSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GasSpeed::Normal => "normal",
            GasSpeed::Fast => "fast",
            GasSpeed::Urgent => "urgent",
            GasSpeed::Custom => "custom",
        };
        write!(f, "{}", label)
    }
}

/// A single fee component: raw wei amount plus its gwei display forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeValue {
    /// Decimal string in wei.
    pub amount: String,
    /// e.g. `"12.4 Gwei"`.
    pub display: String,
    /// Rounded gwei value as a decimal string, for numeric edit fields.
    pub gwei: String,
}

/// Estimated confirmation time for a fee parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedTime {
    pub secs: u64,
    /// e.g. `"~ 12 sec"` or `"> 1 hr"`.
    pub display: String,
}

/// The total fee estimate: raw wei plus its display-currency rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalFee {
    /// Decimal string in wei, including any L1 security fee surcharge.
    pub amount: String,
    /// Native display currency when a price is known, raw units otherwise.
    pub display: String,
}

/// Fee parameters for a single speed on an EIP-1559 chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip1559Params {
    pub speed: GasSpeed,
    #[serde(rename = "maxBaseFee")]
    pub max_base_fee: FeeValue,
    #[serde(rename = "maxPriorityFee")]
    pub max_priority_fee: FeeValue,
    /// Likely-to-max gwei range, e.g. `"13 - 15 Gwei"`.
    pub display: String,
    #[serde(rename = "estimatedTime")]
    pub estimated_time: EstimatedTime,
    #[serde(rename = "gasFee")]
    pub gas_fee: TotalFee,
}

/// Fee parameters for a single speed on a legacy (single gas price) chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyParams {
    pub speed: GasSpeed,
    #[serde(rename = "gasPrice")]
    pub gas_price: FeeValue,
    pub display: String,
    #[serde(rename = "estimatedTime")]
    pub estimated_time: EstimatedTime,
    #[serde(rename = "gasFee")]
    pub gas_fee: TotalFee,
}

/// Per-speed fee parameters, tagged by the chain's fee model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GasFeeParams {
    Eip1559(Eip1559Params),
    Legacy(LegacyParams),
}

impl GasFeeParams {
    pub fn speed(&self) -> GasSpeed {
        match self {
            GasFeeParams::Eip1559(p) => p.speed,
            GasFeeParams::Legacy(p) => p.speed,
        }
    }

    pub fn gas_fee(&self) -> &TotalFee {
        match self {
            GasFeeParams::Eip1559(p) => &p.gas_fee,
            GasFeeParams::Legacy(p) => &p.gas_fee,
        }
    }

    pub fn estimated_time(&self) -> &EstimatedTime {
        match self {
            GasFeeParams::Eip1559(p) => &p.estimated_time,
            GasFeeParams::Legacy(p) => &p.estimated_time,
        }
    }

    /// Whether two parameter sets differ in their total fee. Used to avoid
    /// redundant store writes on every oracle tick.
    pub fn fee_changed_from(&self, other: &GasFeeParams) -> bool {
        self.gas_fee().amount != other.gas_fee().amount
    }
}

/// Mapping from speed to fee parameters.
///
/// Either all of `normal`/`fast`/`urgent` are present (a complete suggestion
/// set) or the whole struct is absent upstream (still loading). `custom` is
/// carried independently and persists across oracle refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasFeeParamsBySpeed {
    pub normal: GasFeeParams,
    pub fast: GasFeeParams,
    pub urgent: GasFeeParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<GasFeeParams>,
}

impl GasFeeParamsBySpeed {
    /// Parameters for a speed; `Custom` falls back to `Fast` when the user
    /// has not configured custom fees.
    pub fn get(&self, speed: GasSpeed) -> &GasFeeParams {
        match speed {
            GasSpeed::Normal => &self.normal,
            GasSpeed::Fast => &self.fast,
            GasSpeed::Urgent => &self.urgent,
            GasSpeed::Custom => self.custom.as_ref().unwrap_or(&self.fast),
        }
    }

    /// Whether any tier's total fee differs from `other`'s. Tiers compare by
    /// fee amount, so identical polls do not count as a change.
    pub fn fees_changed_from(&self, other: &GasFeeParamsBySpeed) -> bool {
        self.normal.fee_changed_from(&other.normal)
            || self.fast.fee_changed_from(&other.fast)
            || self.urgent.fee_changed_from(&other.urgent)
            || match (&self.custom, &other.custom) {
                (Some(a), Some(b)) => a.fee_changed_from(b),
                (None, None) => false,
                _ => true,
            }
    }
}

/// The minimal fee settings needed to price a transaction, as persisted per
/// chain for the custom speed and as fed into funds checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GasSettings {
    Eip1559 {
        #[serde(rename = "maxBaseFee")]
        max_base_fee: String,
        #[serde(rename = "maxPriorityFee")]
        max_priority_fee: String,
    },
    Legacy {
        #[serde(rename = "gasPrice")]
        gas_price: String,
    },
}

impl GasSettings {
    pub fn is_eip1559(&self) -> bool {
        matches!(self, GasSettings::Eip1559 { .. })
    }
}

/// Direction the oracle reports the base fee moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseFeeTrend {
    Falling,
    Stable,
    Surging,
    Rising,
    Unknown,
}

impl BaseFeeTrend {
    pub fn from_oracle(raw: i8) -> BaseFeeTrend {
        match raw {
            -1 => BaseFeeTrend::Falling,
            0 => BaseFeeTrend::Stable,
            1 => BaseFeeTrend::Surging,
            2 => BaseFeeTrend::Rising,
            _ => BaseFeeTrend::Unknown,
        }
    }
}

/// Base-fee thresholds (wei decimal strings) above which inclusion is
/// expected within the keyed number of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksByBaseFee {
    #[serde(rename = "4")]
    pub in_4: String,
    #[serde(rename = "8")]
    pub in_8: String,
    #[serde(rename = "40")]
    pub in_40: String,
    #[serde(rename = "120")]
    pub in_120: String,
    #[serde(rename = "240")]
    pub in_240: String,
}

/// Priority-fee thresholds (wei decimal strings) for inclusion within the
/// keyed number of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksByPriorityFee {
    #[serde(rename = "1")]
    pub in_1: String,
    #[serde(rename = "2")]
    pub in_2: String,
    #[serde(rename = "3")]
    pub in_3: String,
    #[serde(rename = "4")]
    pub in_4: String,
}

/// Per-speed priority-fee suggestions (wei decimal strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityFeeSuggestions {
    pub normal: String,
    pub fast: String,
    pub urgent: String,
}

impl PriorityFeeSuggestions {
    pub fn for_speed(&self, speed: GasSpeed) -> &str {
        match speed {
            GasSpeed::Normal => &self.normal,
            GasSpeed::Fast => &self.fast,
            // Custom starts from the urgent suggestion until edited
            GasSpeed::Urgent | GasSpeed::Custom => &self.urgent,
        }
    }
}

/// Fee data for an EIP-1559 chain as returned by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip1559FeeData {
    #[serde(rename = "currentBaseFee")]
    pub current_base_fee: String,
    #[serde(rename = "baseFeeSuggestion")]
    pub base_fee_suggestion: String,
    #[serde(rename = "baseFeeTrend")]
    pub base_fee_trend: i8,
    #[serde(rename = "secondsPerNewBlock")]
    pub seconds_per_new_block: u64,
    #[serde(rename = "maxPriorityFeeSuggestions")]
    pub max_priority_fee_suggestions: PriorityFeeSuggestions,
    #[serde(rename = "blocksToConfirmationByBaseFee")]
    pub blocks_to_confirmation_by_base_fee: BlocksByBaseFee,
    #[serde(rename = "blocksToConfirmationByPriorityFee")]
    pub blocks_to_confirmation_by_priority_fee: BlocksByPriorityFee,
}

/// Legacy speed table (gwei decimal strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyFeeData {
    #[serde(rename = "safeGasPrice")]
    pub safe_gas_price: String,
    #[serde(rename = "proposeGasPrice")]
    pub propose_gas_price: String,
    #[serde(rename = "fastGasPrice")]
    pub fast_gas_price: String,
}

/// Fee-oracle payload, one shape per chain fee model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeeOracleData {
    Legacy { legacy: LegacyFeeData },
    Eip1559(Box<Eip1559FeeData>),
}

impl FeeOracleData {
    pub fn as_eip1559(&self) -> Option<&Eip1559FeeData> {
        match self {
            FeeOracleData::Eip1559(data) => Some(data),
            FeeOracleData::Legacy { .. } => None,
        }
    }

    pub fn as_legacy(&self) -> Option<&LegacyFeeData> {
        match self {
            FeeOracleData::Legacy { legacy } => Some(legacy),
            FeeOracleData::Eip1559(_) => None,
        }
    }
}
