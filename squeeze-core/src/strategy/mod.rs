//! Strategy module
//!
//! The squeeze/breakout rule set, its outcome types, and the per-symbol
//! evaluator that feeds it from a bar provider.

pub mod evaluator;
pub mod signal;
pub mod squeeze;

pub use evaluator::*;
pub use signal::*;
pub use squeeze::*;
