//! # Asset References
//!
//! Token references selected into a swap. Assets are immutable once fetched:
//! a selection change replaces the whole struct, the engine never patches
//! individual fields.

use serde::{Deserialize, Serialize};

use super::chain::ChainId;

/// A token reference as selected into either side of a swap.
///
/// All amounts and prices are decimal strings; arithmetic on them goes
/// through the engine's safe-math layer, never native floats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Token contract address (lowercased hex), or the chain's native-asset
    /// pseudo-address.
    pub address: String,
    #[serde(rename = "chainId")]
    pub chain_id: ChainId,
    pub decimals: u32,
    pub symbol: String,
    /// Price of one whole token in the account's display currency, when
    /// known. Absent prices degrade displays, never crash them.
    #[serde(rename = "nativePrice", skip_serializing_if = "Option::is_none")]
    pub native_price: Option<String>,
    /// Owned balance in whole-token decimal units.
    pub balance: String,
}

impl Asset {
    /// Whether this asset is the chain's native asset (gas currency).
    pub fn is_native(&self) -> bool {
        self.address.eq_ignore_ascii_case(self.chain_id.native_asset_address())
    }

    /// Whether this asset is the canonical wrapped-native token of its chain.
    pub fn is_wrapped_native(&self) -> bool {
        self.chain_id
            .wrapped_native_address()
            .is_some_and(|wrapped| self.address.eq_ignore_ascii_case(wrapped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth() -> Asset {
        Asset {
            address: ChainId::MAINNET.native_asset_address().to_string(),
            chain_id: ChainId::MAINNET,
            decimals: 18,
            symbol: "ETH".to_string(),
            native_price: Some("3200.50".to_string()),
            balance: "1.25".to_string(),
        }
    }

    #[test]
    fn test_native_detection() {
        assert!(eth().is_native());
        assert!(!eth().is_wrapped_native());
    }

    #[test]
    fn test_wrapped_native_detection_is_case_insensitive() {
        let mut weth = eth();
        weth.address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string();
        weth.symbol = "WETH".to_string();
        assert!(weth.is_wrapped_native());
        assert!(!weth.is_native());
    }
}
