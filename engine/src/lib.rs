//! # Swap Gas & Quote Orchestration Engine - Library Root
//!
//! The headless engine behind a non-custodial wallet's swap screen. It keeps
//! gas fee estimates and swap quotes fresh while the user edits a swap, and
//! derives the warnings, confirmation-time estimates, and funds checks the
//! UI renders.
//!
//! ## Features
//!
//! - **Gas Orchestration**: Polls chain fee oracles, parses per-speed fee
//!   parameter sets for both EIP-1559 and legacy chains, and simulates gas
//!   limits for pending transactions
//! - **Quote Orchestration**: Debounced, cancellable quote fetching with
//!   wrap/unwrap detection and cross-chain support
//! - **Derived Review State**: Price-impact classification, prioritized
//!   warnings, and gas-funds sufficiency with a safety buffer
//! - **Navigation**: Per-side focus steps and the shared config panel,
//!   with a closed transition table
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               swap-engine (this crate)               │
//! ├──────────────────────────────────────────────────────┤
//! │  Tokio          - Async runtime (background context) │
//! │  Reqwest        - HTTP client (oracle, quote API)    │
//! │  async-channel  - Background → interactive hand-off  │
//! │  parking_lot    - Synchronous state locks            │
//! │  bigdecimal     - Arbitrary-precision fee math       │
//! └──────────────────────────────────────────────────────┘
//!          │                          │
//!          │ HTTP                     │ HTTP
//!          ▼                          ▼
//! ┌─────────────────┐      ┌─────────────────────────┐
//! │   Fee Oracle    │      │   Quote Aggregator      │
//! └─────────────────┘      └─────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **core**: Error types, configuration, and service traits for
//!   dependency injection
//! - **runtime**: The dual-context plumbing (hand-off cell, interval
//!   scheduler, debouncer)
//! - **services**: HTTP implementations of the service traits
//! - **gas**: Fee parsing, gas-limit estimation, per-chain custom settings,
//!   and the polling controller
//! - **quote**: The quote coordinator
//! - **app**: The assembled engine (navigation, warnings, funds checks,
//!   swap state)
//! - **utils**: Safe string-decimal arithmetic

pub mod app;
pub mod core;
pub mod gas;
pub mod quote;
pub mod runtime;
pub mod services;
pub mod utils;

pub use app::SwapEngine;
pub use crate::core::config::EngineConfig;
pub use crate::core::error::{EngineError, Result};
