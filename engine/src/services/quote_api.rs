//! # Quote Aggregator Client
//!
//! HTTP client for the swap quote aggregator. The aggregator answers both
//! success and failure as HTTP 200: a failed quote comes back as a
//! structured error body with a code and message, which
//! [`shared::QuoteResult`] decodes without guessing from status codes.

use async_trait::async_trait;
use shared::QuoteResult;
use std::time::Duration;
use tracing::debug;

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::service::{QuoteRequest, QuoteService};

/// Quote-aggregator client over HTTP.
pub struct HttpQuoteService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuoteService {
    pub fn new(config: &EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, base_url: config.quote_base_url.clone() }
    }

    async fn fetch(&self, path: &str, request: &QuoteRequest) -> Result<QuoteResult> {
        let url = format!("{}{}", self.base_url, path);
        debug!(
            chain_id = %request.chain_id,
            to_chain_id = %request.to_chain_id,
            side = ?request.side,
            "fetching quote"
        );

        let response = self.client.get(&url).query(request).send().await.map_err(|e| {
            EngineError::Quote { code: -1, message: format!("Network error: {e}") }
        })?;

        if !response.status().is_success() {
            return Err(EngineError::Quote {
                code: i64::from(response.status().as_u16()),
                message: "quote aggregator returned an HTTP error".to_string(),
            });
        }

        response.json::<QuoteResult>().await.map_err(|e| EngineError::Quote {
            code: -1,
            message: format!("Failed to parse quote: {e}"),
        })
    }
}

#[async_trait]
impl QuoteService for HttpQuoteService {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<QuoteResult> {
        self.fetch("/v1/quote", request).await
    }

    async fn fetch_crosschain_quote(&self, request: &QuoteRequest) -> Result<QuoteResult> {
        self.fetch("/v1/quote/crosschain", request).await
    }
}
