//! # Fee Oracle Client
//!
//! HTTP client for the per-chain fee oracle. The oracle serves EIP-1559
//! data for chains it models that way and a legacy speed table otherwise;
//! [`shared::FeeOracleData`] distinguishes the two shapes.

use async_trait::async_trait;
use serde::Deserialize;
use shared::{ChainId, FeeOracleData, LegacyFeeData};
use std::time::Duration;
use tracing::debug;

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::service::FeeOracle;
use crate::services::node::NodeClient;
use crate::utils::math;

#[derive(Debug, Deserialize)]
struct OracleEnvelope {
    data: FeeOracleData,
}

/// Fee-oracle client over HTTP, with a chain-provider fallback for chains
/// the oracle does not model.
pub struct HttpFeeOracle {
    client: reqwest::Client,
    base_url: String,
    node: NodeClient,
}

impl HttpFeeOracle {
    pub fn new(config: &EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, base_url: config.oracle_base_url.clone(), node: NodeClient::new(config) }
    }

    /// Uncovered chains get a flat legacy speed table from the chain
    /// provider; every speed resolves to the current gas price.
    async fn provider_fallback(&self, chain_id: ChainId) -> Result<FeeOracleData> {
        debug!(%chain_id, "chain not covered by the fee oracle, using provider gas price");
        let gas_price_wei = self
            .node
            .gas_price(chain_id)
            .await
            .map_err(|e| EngineError::Oracle(e.to_string()))?;
        let gwei = math::wei_to_gwei(&gas_price_wei)?;
        Ok(FeeOracleData::Legacy {
            legacy: LegacyFeeData {
                safe_gas_price: gwei.clone(),
                propose_gas_price: gwei.clone(),
                fast_gas_price: gwei,
            },
        })
    }
}

#[async_trait]
impl FeeOracle for HttpFeeOracle {
    async fn fee_data(&self, chain_id: ChainId) -> Result<FeeOracleData> {
        if !chain_id.supported_by_fee_oracle() {
            return self.provider_fallback(chain_id).await;
        }

        let url = format!("{}/v1/gas/{}", self.base_url, chain_id);
        debug!(%chain_id, "fetching fee data");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(EngineError::Oracle(format!(
                "oracle returned HTTP {} for chain {chain_id}",
                response.status()
            )));
        }

        let envelope: OracleEnvelope = response.json().await?;
        Ok(envelope.data)
    }
}
