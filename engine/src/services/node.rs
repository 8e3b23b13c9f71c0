//! # JSON-RPC Node Client
//!
//! A thin JSON-RPC client used for the engine concerns that need a node
//! rather than an indexer: gas-limit simulation (`eth_estimateGas`), the
//! OP-stack L1 data-posting fee (an `eth_call` against the gas price oracle
//! predeploy), and the account delegation status (`eth_getCode`).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{ChainId, TxRequest};
use std::time::Duration;
use tracing::debug;

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::service::{DelegationService, GasSimulator, L1FeeOracle};
use crate::utils::math;

/// Simulated gas limits get padded so a block-to-block state change does not
/// push the real execution over the limit.
const GAS_LIMIT_PADDING: &str = "1.2";

/// The OP-stack gas price oracle predeploy.
const OP_GAS_PRICE_ORACLE: &str = "0x420000000000000000000000000000000000000F";

/// Selector of `getL1Fee(bytes)`.
const GET_L1_FEE_SELECTOR: &str = "49948e0e";

/// EIP-7702 delegation designator prefix in deployed account code.
const DELEGATION_DESIGNATOR_PREFIX: &str = "0xef0100";

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// JSON-RPC client routed through a gateway keyed by chain id.
pub struct NodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl NodeClient {
    pub fn new(config: &EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, base_url: config.rpc_base_url.clone() }
    }

    async fn call(&self, chain_id: ChainId, method: &str, params: Value) -> Result<String> {
        let url = format!("{}/{}", self.base_url, chain_id);
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            EngineError::Simulation(format!("Network error: {e}"))
        })?;
        let rpc: RpcResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Simulation(format!("Failed to parse response: {e}")))?;

        if let Some(err) = rpc.error {
            return Err(EngineError::Simulation(format!(
                "{method} failed ({}): {}",
                err.code, err.message
            )));
        }
        rpc.result
            .ok_or_else(|| EngineError::Simulation(format!("{method} returned no result")))
    }

    /// Current `eth_gasPrice`, decimal wei. Used as the fee source for
    /// chains the oracle does not cover.
    pub async fn gas_price(&self, chain_id: ChainId) -> Result<String> {
        let raw = self.call(chain_id, "eth_gasPrice", json!([])).await?;
        parse_hex_quantity(&raw)
    }
}

#[async_trait]
impl GasSimulator for NodeClient {
    async fn estimate_gas_limit(&self, chain_id: ChainId, tx: &TxRequest) -> Result<String> {
        let params = json!([{
            "from": tx.from,
            "to": tx.to,
            "value": tx.value,
            "data": tx.data,
        }]);
        let raw = self.call(chain_id, "eth_estimateGas", params).await?;
        let estimated = parse_hex_quantity(&raw)?;
        let padded = math::scale_to_wei(&estimated, GAS_LIMIT_PADDING)?;
        debug!(%chain_id, estimated, padded, "simulated gas limit");
        Ok(padded)
    }
}

#[async_trait]
impl L1FeeOracle for NodeClient {
    async fn l1_security_fee(&self, chain_id: ChainId, tx: &TxRequest) -> Result<String> {
        let params = json!([
            {
                "to": OP_GAS_PRICE_ORACLE,
                "data": encode_get_l1_fee(&tx.data),
            },
            "latest",
        ]);
        let raw = self.call(chain_id, "eth_call", params).await?;
        parse_hex_quantity(&raw)
    }
}

#[async_trait]
impl DelegationService for NodeClient {
    async fn is_delegated(&self, chain_id: ChainId, address: &str) -> Result<bool> {
        let params = json!([address, "latest"]);
        let code = self.call(chain_id, "eth_getCode", params).await?;
        Ok(code_is_delegation(&code))
    }
}

/// Whether account code starts with the EIP-7702 delegation designator.
fn code_is_delegation(code: &str) -> bool {
    code.to_lowercase().starts_with(DELEGATION_DESIGNATOR_PREFIX)
}

/// Decode a JSON-RPC hex quantity (`"0x..."`) to a decimal string.
fn parse_hex_quantity(raw: &str) -> Result<String> {
    let digits = raw.trim_start_matches("0x");
    // eth_call may return a full 32-byte word; the value still fits u128
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok("0".to_string());
    }
    u128::from_str_radix(digits, 16)
        .map(|v| v.to_string())
        .map_err(|_| EngineError::Simulation(format!("not a hex quantity: {raw:?}")))
}

/// ABI-encode `getL1Fee(bytes)` for the given calldata.
fn encode_get_l1_fee(calldata: &str) -> String {
    let payload = calldata.trim_start_matches("0x");
    let byte_len = payload.len() / 2;
    let padded_len = payload.len().div_ceil(64) * 64;
    format!(
        "0x{GET_L1_FEE_SELECTOR}{:064x}{:064x}{payload:0<padded_len$}",
        32, byte_len
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_quantity() {
        assert_eq!(parse_hex_quantity("0x5208").unwrap(), "21000");
        assert_eq!(parse_hex_quantity("0x0").unwrap(), "0");
        assert_eq!(
            parse_hex_quantity(
                "0x0000000000000000000000000000000000000000000000000000000000005208"
            )
            .unwrap(),
            "21000"
        );
        assert!(parse_hex_quantity("0xzz").is_err());
    }

    #[test]
    fn test_delegation_designator_detection() {
        // A delegated EOA's code is the designator plus the target address
        assert!(code_is_delegation("0xef01001111111111111111111111111111111111111111"));
        assert!(code_is_delegation("0xEF01002222222222222222222222222222222222222222"));
        // Plain EOA and ordinary contract code
        assert!(!code_is_delegation("0x"));
        assert!(!code_is_delegation("0x6080604052"));
    }

    #[test]
    fn test_encode_get_l1_fee_layout() {
        let encoded = encode_get_l1_fee("0xdeadbeef");
        // selector + offset word + length word + one padded data word
        assert_eq!(encoded.len(), 2 + 8 + 64 + 64 + 64);
        assert!(encoded.starts_with("0x49948e0e"));
        assert!(encoded.contains("deadbeef"));
        // 4 data bytes right-padded to a 32-byte word: 56 trailing zero digits
        assert!(encoded
            .ends_with("deadbeef00000000000000000000000000000000000000000000000000000000"));
    }
}
