//! Technical indicators module
//!
//! Rolling-window indicators used to build the breakout band. Moving averages
//! come from the `ta` crate; the standard deviation is computed here because
//! the band uses the sample (n-1) estimator.

pub mod bb;
pub mod sma;
pub mod stddev;

pub use bb::*;
pub use sma::*;
pub use stddev::*;

/// Indicator trait for all indicators
pub trait Indicator {
    /// Get the name of the indicator
    fn name(&self) -> &str;

    /// Update indicator with new value
    fn update(&mut self, value: f64);

    /// Get current indicator value
    fn value(&self) -> Option<f64>;

    /// Check if indicator is ready (has enough data)
    fn is_ready(&self) -> bool;
}
