//! # Dual-Context Runtime Plumbing
//!
//! The engine straddles two execution contexts: an **interactive** context
//! owned by the embedder (the UI thread, driven frame by frame) and a
//! **background** context (Tokio tasks doing network and simulation work).
//!
//! Background work never mutates interactive state directly. Every mutation
//! is handed across as a job on a single channel and applied when the
//! embedder drains it, so the interactive side sees changes at well-defined
//! points and never races a fetch.
//!
//! ## Modules
//!
//! - **[`context`]**: The job channel between the two contexts
//! - **[`cell`]**: An observable value cell whose writes ride that channel
//! - **[`interval`]**: A stop/start polling scheduler
//! - **[`debounce`]**: A trailing-edge debouncer for bursty inputs

pub mod cell;
pub mod context;
pub mod debounce;
pub mod interval;

pub use cell::HandoffCell;
pub use context::EngineContext;
pub use debounce::Debouncer;
pub use interval::{IntervalConfig, IntervalScheduler};
