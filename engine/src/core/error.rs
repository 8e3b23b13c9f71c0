//! # Common Error Types
//!
//! Consolidated error handling for the swap engine.
//!
//! This module provides a centralized error type [`EngineError`] covering all
//! failure scenarios in the engine.
//!
//! ## Error Categories
//!
//! - **Oracle**: Fee-oracle communication errors (network, HTTP, JSON parsing)
//! - **Quote**: Quote-aggregator errors, including structured in-band errors
//!   the aggregator returns with a code and message
//! - **Simulation**: Gas-limit simulation failures against a node
//! - **Math**: String-decimal parsing or arithmetic failures (malformed
//!   amounts, division by zero)
//! - **State**: Invalid engine state (illegal navigation transition, missing
//!   preconditions)
//! - **Config**: Invalid or missing configuration values
//!
//! ## Usage Pattern
//!
//! ```rust
//! use swap_engine::core::error::{EngineError, Result};
//!
//! fn parse_wei(raw: &str) -> Result<u128> {
//!     raw.parse()
//!         .map_err(|_| EngineError::Math(format!("not a wei amount: {raw}")))
//! }
//! ```

use thiserror::Error;

/// Engine-wide error type.
///
/// Each variant carries a descriptive message; `thiserror` derives the
/// `Display` and `Error` implementations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Fee-oracle communication failure.
    ///
    /// Network errors, HTTP status errors, and malformed oracle payloads.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Quote-aggregator failure.
    ///
    /// Covers transport errors and structured aggregator errors. Structured
    /// errors keep their upstream code so the warning layer can surface it.
    #[error("Quote error ({code}): {message}")]
    Quote { code: i64, message: String },

    /// Gas-limit simulation failure.
    #[error("Simulation error: {0}")]
    Simulation(String),

    /// String-decimal math failure.
    ///
    /// Malformed numeric strings, division by zero, or precision loss that
    /// would silently corrupt a fee amount.
    #[error("Math error: {0}")]
    Math(String),

    /// Invalid engine state.
    ///
    /// Illegal navigation transitions and operations attempted without their
    /// preconditions (e.g. pricing a fee before any oracle data arrived).
    #[error("State error: {0}")]
    State(String),

    /// Invalid or missing configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl EngineError {
    /// Build a quote error from an aggregator's structured error payload.
    pub fn from_quote_error(err: &shared::QuoteError) -> Self {
        EngineError::Quote {
            code: err.error_code,
            message: err.message.clone(),
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Oracle(format!("Network error: {err}"))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Oracle(format!("Failed to parse response: {err}"))
    }
}

/// Convenience type alias for `Result<T, EngineError>`.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::Oracle("connection refused".to_string());
        assert_eq!(err.to_string(), "Oracle error: connection refused");

        let err = EngineError::Quote { code: 502, message: "no routes found".to_string() };
        assert_eq!(err.to_string(), "Quote error (502): no routes found");
    }

    #[test]
    fn test_from_quote_error_keeps_code() {
        let upstream = shared::QuoteError {
            error: true,
            error_code: 1001,
            message: "insufficient liquidity".to_string(),
        };
        match EngineError::from_quote_error(&upstream) {
            EngineError::Quote { code, message } => {
                assert_eq!(code, 1001);
                assert_eq!(message, "insufficient liquidity");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
