//! Scanning module
//!
//! Fan-out of the evaluator over the universe, progress snapshots, and the
//! final report.

pub mod driver;
pub mod progress;
pub mod report;

pub use driver::*;
pub use progress::*;
pub use report::*;
