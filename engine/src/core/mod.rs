//! # Core Abstractions
//!
//! Error types, configuration, and service traits for dependency injection.
//!
//! ## Modules
//!
//! - **[`error`]**: Engine error types (`EngineError`, `Result<T>`)
//! - **[`config`]**: Environment-driven engine configuration
//! - **[`service`]**: Service traits the orchestrators depend on
//!   (`FeeOracle`, `QuoteService`, `GasSimulator`, `L1FeeOracle`,
//!   `DelegationService`)
//!
//! ## Dependency Injection
//!
//! The orchestrators never name concrete clients; they hold `Arc<dyn Trait>`
//! handles so tests can substitute mocks:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use swap_engine::core::service::FeeOracle;
//! use swap_engine::services::oracle::HttpFeeOracle;
//! use swap_engine::EngineConfig;
//!
//! let config = EngineConfig::from_env();
//! let oracle: Arc<dyn FeeOracle> = Arc::new(HttpFeeOracle::new(&config));
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use service::{DelegationService, FeeOracle, GasSimulator, L1FeeOracle, QuoteService};
