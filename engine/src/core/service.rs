//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and
//! modularity. The orchestrators depend only on these traits; production
//! wiring supplies the HTTP implementations in [`crate::services`], tests
//! supply mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{ChainId, FeeOracleData, QuoteResult, SwapSide, TxRequest};

use crate::core::error::Result;

/// A swap quote request as sent to the aggregator.
///
/// Exactly one of the amounts is set, matching [`side`](Self::side): the
/// sell amount for an input-side swap, the buy amount for output-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub chain_id: ChainId,
    /// Destination chain; differs from `chain_id` only for cross-chain swaps.
    pub to_chain_id: ChainId,
    pub sell_token: String,
    pub buy_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_amount: Option<String>,
    pub side: SwapSide,
    pub from_address: String,
    pub slippage_bps: u16,
}

impl QuoteRequest {
    pub fn is_crosschain(&self) -> bool {
        self.chain_id != self.to_chain_id
    }
}

/// Per-chain fee oracle.
///
/// Returns EIP-1559 data on chains the oracle models that way, legacy speed
/// tables otherwise. Implementations cover every chain the engine supports,
/// falling back to node gas prices where the oracle itself has no data.
#[async_trait]
pub trait FeeOracle: Send + Sync {
    async fn fee_data(&self, chain_id: ChainId) -> Result<FeeOracleData>;
}

/// Swap quote aggregator.
#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Fetch a quote for a same-chain swap (including wraps and unwraps).
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<QuoteResult>;

    /// Fetch a quote for a cross-chain swap.
    async fn fetch_crosschain_quote(&self, request: &QuoteRequest) -> Result<QuoteResult>;
}

/// Gas-limit estimation against a node.
#[async_trait]
pub trait GasSimulator: Send + Sync {
    /// Simulate the transaction and return the padded gas limit as a decimal
    /// string in gas units.
    async fn estimate_gas_limit(&self, chain_id: ChainId, tx: &TxRequest) -> Result<String>;
}

/// L1 data-posting fee oracle for OP-stack chains.
#[async_trait]
pub trait L1FeeOracle: Send + Sync {
    /// The L1 security fee in wei for posting this transaction's calldata.
    async fn l1_security_fee(&self, chain_id: ChainId, tx: &TxRequest) -> Result<String>;
}

/// Account delegation lookup.
///
/// Whether an address carries an EIP-7702 delegation designator on a chain,
/// which lets approval and swap execute as one batched transaction.
#[async_trait]
pub trait DelegationService: Send + Sync {
    async fn is_delegated(&self, chain_id: ChainId, address: &str) -> Result<bool>;
}
