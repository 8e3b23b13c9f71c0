//! # Swap Form State
//!
//! What the user has entered so far. The form is not always a fetchable
//! swap; [`SwapForm::to_input`] is the single place that decides when it
//! becomes one.

use shared::{Asset, SwapSide};

use crate::quote::SwapInput;
use crate::utils::math;

/// The swap form as the user edits it.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapForm {
    pub sell_asset: Option<Asset>,
    pub buy_asset: Option<Asset>,
    /// Amount in decimal token units, on `side`.
    pub amount: String,
    pub side: SwapSide,
    pub slippage_bps: u16,
    pub from_address: String,
    /// Native-asset balance of the account on the sell chain, decimal units.
    pub native_balance: String,
    /// True while the user is scrubbing the amount slider.
    pub scrubbing: bool,
}

impl SwapForm {
    pub fn new(from_address: &str) -> Self {
        Self {
            sell_asset: None,
            buy_asset: None,
            amount: "0".to_string(),
            side: SwapSide::Input,
            slippage_bps: 100,
            from_address: from_address.to_string(),
            native_balance: "0".to_string(),
            scrubbing: false,
        }
    }

    /// The fetchable swap this form describes, if it describes one yet:
    /// both assets picked and a positive amount entered.
    pub fn to_input(&self) -> Option<SwapInput> {
        let sell_asset = self.sell_asset.clone()?;
        let buy_asset = self.buy_asset.clone()?;
        let positive = math::gt(&self.amount, "0").unwrap_or(false);
        if !positive {
            return None;
        }
        Some(SwapInput {
            sell_asset,
            buy_asset,
            amount: self.amount.clone(),
            side: self.side,
            from_address: self.from_address.clone(),
            slippage_bps: self.slippage_bps,
        })
    }
}
