//! # External Service Clients
//!
//! HTTP implementations of the [`core::service`](crate::core::service)
//! traits.
//!
//! - **[`oracle`]**: Fee-oracle client
//! - **[`quote_api`]**: Quote-aggregator client
//! - **[`node`]**: JSON-RPC node client (gas simulation, L1 fee lookups,
//!   delegation status)

pub mod node;
pub mod oracle;
pub mod quote_api;

pub use node::NodeClient;
pub use oracle::HttpFeeOracle;
pub use quote_api::HttpQuoteService;
