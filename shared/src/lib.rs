//! # Shared Swap Data Model
//!
//! This library defines the data model shared between the swap engine and its
//! UI consumers: chain identifiers, assets, quotes, and gas fee parameters.
//! All types use `serde` for JSON serialization against the backend APIs.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects and domain types
//!   - **[`dto::chain`]**: Chain identifiers and per-chain fee capabilities
//!   - **[`dto::asset`]**: Token asset references
//!   - **[`dto::quote`]**: Swap quotes and quote errors (tagged union)
//!   - **[`dto::gas`]**: Gas speeds, fee parameters, and fee-oracle responses
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_time_estimate`]**: Human wait-time display strings
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON using default `serde` behavior:
//! - Field names use **snake_case** in Rust; external camelCase fields are
//!   mapped with `#[serde(rename)]`
//! - Optional fields are omitted from JSON when `None`
//! - All structs implement both `Serialize` and `Deserialize`

pub mod dto;
pub mod utils;

pub use dto::asset::Asset;
pub use dto::chain::{ChainId, ChainWaitTimes};
pub use dto::gas::{
    BaseFeeTrend, BlocksByBaseFee, BlocksByPriorityFee, Eip1559FeeData, Eip1559Params,
    EstimatedTime, FeeOracleData, FeeValue, GasFeeParams, GasFeeParamsBySpeed, GasSettings,
    GasSpeed, LegacyFeeData, LegacyParams, PriorityFeeSuggestions, TotalFee,
};
pub use dto::quote::{Quote, QuoteError, QuoteResult, SwapSide, SwapType, TxRequest};
