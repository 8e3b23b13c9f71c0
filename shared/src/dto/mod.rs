//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged between the swap engine, the fee-oracle and
//! quote backends, and UI consumers.
//!
//! ## Module Organization
//!
//! - [`chain`] - Chain identifiers and per-chain fee-model capabilities
//! - [`asset`] - Token asset references selected into a swap
//! - [`quote`] - Trade quotes and quote errors (tagged union)
//! - [`gas`] - Gas speeds, fee parameters, and raw fee-oracle responses
//!
//! ## Serialization Format
//!
//! All DTOs use `serde_json` for JSON serialization:
//!
//! - **Field naming**: snake_case in Rust; backend camelCase fields mapped
//!   with `#[serde(rename)]`
//! - **Optional fields**: Omitted when `None`
//! - **Enums**: Serialize to lowercase strings using
//!   `#[serde(rename_all = "lowercase")]`
//! - **All types**: Implement both `Serialize` and `Deserialize`

pub mod asset;
pub mod chain;
pub mod gas;
pub mod quote;

pub use asset::*;
pub use chain::*;
pub use gas::*;
pub use quote::*;
