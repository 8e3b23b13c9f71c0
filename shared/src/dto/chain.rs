//! # Chain Identifiers
//!
//! Opaque EVM chain identifiers plus the per-chain capability tables the gas
//! engine keys its decisions on: which fee model a chain speaks, whether it
//! charges an L1 data-availability fee, and the static gas-unit fallbacks
//! used when simulation is unavailable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an EVM-compatible network.
///
/// Every fee computation in the engine is scoped to exactly one `ChainId`
/// at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

/// Static wait-time estimates (seconds) for chains without confirmation
/// tables in the fee oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainWaitTimes {
    pub safe: u64,
    pub proposed: u64,
    pub fast: u64,
}

impl ChainId {
    pub const MAINNET: ChainId = ChainId(1);
    pub const OPTIMISM: ChainId = ChainId(10);
    pub const BSC: ChainId = ChainId(56);
    pub const POLYGON: ChainId = ChainId(137);
    pub const BASE: ChainId = ChainId(8453);
    pub const ARBITRUM: ChainId = ChainId(42161);
    pub const ZORA: ChainId = ChainId(7777777);
    pub const SEPOLIA: ChainId = ChainId(11155111);
    pub const HOLESKY: ChainId = ChainId(17000);

    /// Whether the fee oracle serves this chain at all. Unsupported chains
    /// fall back to the chain provider's legacy speed table.
    pub fn supported_by_fee_oracle(self) -> bool {
        matches!(
            self,
            ChainId::MAINNET
                | ChainId::OPTIMISM
                | ChainId::BSC
                | ChainId::POLYGON
                | ChainId::BASE
                | ChainId::ARBITRUM
                | ChainId::ZORA
                | ChainId::SEPOLIA
                | ChainId::HOLESKY
        )
    }

    /// Whether the chain uses the EIP-1559 fee model (base fee + priority
    /// tip). Chains that don't are priced with a single legacy gas price.
    pub fn supports_eip1559(self) -> bool {
        matches!(
            self,
            ChainId::MAINNET
                | ChainId::OPTIMISM
                | ChainId::BASE
                | ChainId::ARBITRUM
                | ChainId::ZORA
                | ChainId::SEPOLIA
                | ChainId::HOLESKY
        )
    }

    /// L2 rollups that charge an additional L1 data-availability fee on top
    /// of execution gas.
    pub fn needs_l1_security_fee(self) -> bool {
        matches!(self, ChainId::OPTIMISM | ChainId::BASE | ChainId::ZORA)
    }

    /// Chains where the UI pins the default transaction speed rather than
    /// exposing the full speed selector.
    pub fn uses_default_tx_speed(self) -> bool {
        matches!(self, ChainId::MAINNET | ChainId::POLYGON)
    }

    /// Static wait-time estimates for legacy-fee chains, `None` when the
    /// oracle's confirmation tables should be used instead.
    pub fn wait_times(self) -> Option<ChainWaitTimes> {
        match self {
            ChainId::BSC | ChainId::POLYGON => {
                Some(ChainWaitTimes { safe: 6, proposed: 3, fast: 3 })
            }
            ChainId::OPTIMISM | ChainId::BASE | ChainId::ZORA => {
                Some(ChainWaitTimes { safe: 20, proposed: 20, fast: 20 })
            }
            ChainId::ARBITRUM => Some(ChainWaitTimes { safe: 8, proposed: 8, fast: 8 }),
            _ => None,
        }
    }

    /// Static gas-unit fallback for a basic unlock+swap when no quote is
    /// available or simulation fails.
    pub fn basic_swap_gas_limit(self) -> u64 {
        match self {
            // Arbitrum gas limits embed the L1 calldata component
            ChainId::ARBITRUM => 1_000_000,
            _ => 350_000,
        }
    }

    /// Pseudo-address the quote backend uses for the chain's native asset.
    pub fn native_asset_address(self) -> &'static str {
        "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
    }

    /// Canonical wrapped-native token address, used to detect wrap/unwrap
    /// trades that bypass market pricing.
    pub fn wrapped_native_address(self) -> Option<&'static str> {
        match self {
            ChainId::MAINNET => Some("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
            ChainId::OPTIMISM => Some("0x4200000000000000000000000000000000000006"),
            ChainId::BASE => Some("0x4200000000000000000000000000000000000006"),
            ChainId::ZORA => Some("0x4200000000000000000000000000000000000006"),
            ChainId::ARBITRUM => Some("0x82af49447d8a07e3bd95bd0d56f35241523fbab1"),
            ChainId::POLYGON => Some("0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270"),
            ChainId::BSC => Some("0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c"),
            _ => None,
        }
    }

    /// Decimals of the chain's native asset.
    pub fn native_asset_decimals(self) -> u32 {
        18
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        ChainId(id)
    }
}
