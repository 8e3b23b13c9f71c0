//! # Shared Utility Functions
//!
//! Display formatting helpers used across the engine and any frontends.
//!
//! ## Time Formatting
//!
//! - [`format_time_estimate`] - Render a confirmation estimate such as `"~ 12 sec"`

/// One hour; estimates at or past this are shown as `"> 1 hr"`.
pub const MAX_DISPLAYED_WAIT_SECS: u64 = 3600;

/// Render a confirmation-time estimate for display.
///
/// Estimates under one hour render as an approximation (`"~ 45 sec"`,
/// `"~ 5 min"`); an hour or more is clamped to `"> 1 hr"`.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_time_estimate;
///
/// assert_eq!(format_time_estimate(12), "~ 12 sec");
/// assert_eq!(format_time_estimate(300), "~ 5 min");
/// assert_eq!(format_time_estimate(3600), "> 1 hr");
/// ```
pub fn format_time_estimate(secs: u64) -> String {
    if secs >= MAX_DISPLAYED_WAIT_SECS {
        return "> 1 hr".to_string();
    }
    if secs >= 60 {
        format!("~ {} min", secs / 60)
    } else {
        format!("~ {} sec", secs)
    }
}
