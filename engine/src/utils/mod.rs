//! # Engine Utilities
//!
//! - **[`math`]**: Safe arithmetic over string-decimal amounts

pub mod math;
