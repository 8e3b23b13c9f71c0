//! # Engine Configuration
//!
//! Configuration loaded from environment variables and validated on startup
//! to fail fast if misconfigured.
//!
//! There is no global config instance. The config is constructed once by the
//! embedder and injected into the engine and its services, which keeps tests
//! free to build throwaway configs:
//!
//! ```rust
//! use swap_engine::EngineConfig;
//!
//! let config = EngineConfig::from_env();
//! config.validate().expect("invalid engine configuration");
//! ```

use std::env;
use std::time::Duration;

/// Default interval between fee-oracle polls.
pub const DEFAULT_GAS_POLL_MS: u64 = 5_000;
/// Default interval between quote refreshes.
pub const DEFAULT_QUOTE_POLL_MS: u64 = 5_000;
/// Default trailing-edge debounce for custom fee edits.
pub const DEFAULT_CUSTOM_FEE_DEBOUNCE_MS: u64 = 300;
/// Default trailing-edge debounce for gas-limit re-simulation.
pub const DEFAULT_GAS_LIMIT_DEBOUNCE_MS: u64 = 500;
/// Default settle delay before committing an output chain switch.
pub const DEFAULT_CHAIN_SETTLE_DEBOUNCE_MS: u64 = 20;

/// Engine configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Base URL of the per-chain fee oracle service.
    pub oracle_base_url: String,

    /// Base URL of the swap quote aggregator.
    pub quote_base_url: String,

    /// Base URL of the JSON-RPC gateway; the chain id is appended as a path
    /// segment.
    pub rpc_base_url: String,

    /// HTTP request timeout in seconds.
    pub http_timeout_secs: u64,

    /// Interval between fee-oracle polls, in milliseconds.
    ///
    /// Valid range: 1000-60000.
    pub gas_poll_interval_ms: u64,

    /// Interval between quote refreshes, in milliseconds.
    ///
    /// Valid range: 1000-60000.
    pub quote_poll_interval_ms: u64,

    /// Trailing-edge debounce applied to custom fee edits, in milliseconds.
    pub custom_fee_debounce_ms: u64,

    /// Trailing-edge debounce applied to gas-limit re-simulation, in
    /// milliseconds.
    pub gas_limit_debounce_ms: u64,

    /// Settle delay before an output chain switch commits and refetches, in
    /// milliseconds. Long enough for the chain picker to finish animating,
    /// short enough to be imperceptible.
    pub chain_settle_debounce_ms: u64,
}

impl EngineConfig {
    /// Load configuration from environment variables, with defaults for
    /// everything but the service URLs.
    pub fn from_env() -> Self {
        Self {
            oracle_base_url: env::var("FEE_ORACLE_URL")
                .unwrap_or_else(|_| "https://fee-oracle.lumen.dev".to_string()),
            quote_base_url: env::var("QUOTE_API_URL")
                .unwrap_or_else(|_| "https://quotes.lumen.dev".to_string()),
            rpc_base_url: env::var("RPC_BASE_URL")
                .unwrap_or_else(|_| "https://rpc.lumen.dev".to_string()),
            http_timeout_secs: env_u64("HTTP_TIMEOUT_SECS", 10),
            gas_poll_interval_ms: env_u64("GAS_POLL_INTERVAL_MS", DEFAULT_GAS_POLL_MS),
            quote_poll_interval_ms: env_u64("QUOTE_POLL_INTERVAL_MS", DEFAULT_QUOTE_POLL_MS),
            custom_fee_debounce_ms: env_u64(
                "CUSTOM_FEE_DEBOUNCE_MS",
                DEFAULT_CUSTOM_FEE_DEBOUNCE_MS,
            ),
            gas_limit_debounce_ms: env_u64(
                "GAS_LIMIT_DEBOUNCE_MS",
                DEFAULT_GAS_LIMIT_DEBOUNCE_MS,
            ),
            chain_settle_debounce_ms: env_u64(
                "CHAIN_SETTLE_DEBOUNCE_MS",
                DEFAULT_CHAIN_SETTLE_DEBOUNCE_MS,
            ),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.oracle_base_url.starts_with("http") {
            return Err("FEE_ORACLE_URL must be an http(s) URL".to_string());
        }
        if !self.quote_base_url.starts_with("http") {
            return Err("QUOTE_API_URL must be an http(s) URL".to_string());
        }
        if !self.rpc_base_url.starts_with("http") {
            return Err("RPC_BASE_URL must be an http(s) URL".to_string());
        }
        if self.http_timeout_secs == 0 || self.http_timeout_secs > 120 {
            return Err("HTTP_TIMEOUT_SECS must be between 1 and 120".to_string());
        }
        for (name, value) in [
            ("GAS_POLL_INTERVAL_MS", self.gas_poll_interval_ms),
            ("QUOTE_POLL_INTERVAL_MS", self.quote_poll_interval_ms),
        ] {
            if !(1_000..=60_000).contains(&value) {
                return Err(format!("{name} must be between 1000 and 60000"));
            }
        }
        Ok(())
    }

    pub fn gas_poll_interval(&self) -> Duration {
        Duration::from_millis(self.gas_poll_interval_ms)
    }

    pub fn quote_poll_interval(&self) -> Duration {
        Duration::from_millis(self.quote_poll_interval_ms)
    }

    pub fn custom_fee_debounce(&self) -> Duration {
        Duration::from_millis(self.custom_fee_debounce_ms)
    }

    pub fn gas_limit_debounce(&self) -> Duration {
        Duration::from_millis(self.gas_limit_debounce_ms)
    }

    pub fn chain_settle_debounce(&self) -> Duration {
        Duration::from_millis(self.chain_settle_debounce_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            oracle_base_url: "https://fee-oracle.lumen.dev".to_string(),
            quote_base_url: "https://quotes.lumen.dev".to_string(),
            rpc_base_url: "https://rpc.lumen.dev".to_string(),
            http_timeout_secs: 10,
            gas_poll_interval_ms: DEFAULT_GAS_POLL_MS,
            quote_poll_interval_ms: DEFAULT_QUOTE_POLL_MS,
            custom_fee_debounce_ms: DEFAULT_CUSTOM_FEE_DEBOUNCE_MS,
            gas_limit_debounce_ms: DEFAULT_GAS_LIMIT_DEBOUNCE_MS,
            chain_settle_debounce_ms: DEFAULT_CHAIN_SETTLE_DEBOUNCE_MS,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gas_poll_interval(), Duration::from_secs(5));
        assert_eq!(config.custom_fee_debounce(), Duration::from_millis(300));
        assert_eq!(config.chain_settle_debounce(), Duration::from_millis(20));
    }

    #[test]
    fn test_rejects_out_of_range_poll_interval() {
        let config = EngineConfig { gas_poll_interval_ms: 100, ..EngineConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config =
            EngineConfig { oracle_base_url: "ftp://oracle".to_string(), ..EngineConfig::default() };
        assert!(config.validate().is_err());
    }
}
