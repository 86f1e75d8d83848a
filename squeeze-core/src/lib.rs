//! Squeeze-Core: a squeeze-then-breakout screener for Taiwan-listed equities
//!
//! This crate holds everything between the symbol master and the presentation
//! layer:
//! - [ta-rs](https://github.com/greyblake/ta-rs) backed moving averages for the band
//!
//! # Features
//!
//! - **Data Model**: symbols, instruments and daily bars
//! - **Universe**: equity enumeration over the TWSE and TPEx venues
//! - **Technical Indicators**: SMA, sample standard deviation, Bollinger band
//! - **Strategy**: the squeeze/breakout rule set and the per-symbol evaluator
//! - **Scanning**: bounded parallel scan driver with progress and reporting
//!
//! # Example
//!
//! ```no_run
//! use squeeze_core::prelude::*;
//! use std::sync::Arc;
//!
//! async fn scan(provider: Arc<dyn BarProvider>, universe: Vec<SymbolRecord>) -> Result<()> {
//!     let config = ScanConfig::from_preset(Preset::Classic);
//!     let driver = ScanDriver::new(provider, config)?;
//!     let (progress_tx, _progress_rx) = ScanProgress::channel(universe.len());
//!     let report = driver.run(universe, &progress_tx).await;
//!     println!("{}", report.format());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod indicators;
pub mod scan;
pub mod strategy;

// Re-export commonly used types
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::indicators::*;
    pub use crate::scan::*;
    pub use crate::strategy::*;

    pub use anyhow::{Context, Result};
}

/// Result type alias
pub type Result<T> = anyhow::Result<T>;

/// Round to two decimal places, the precision used for every reported figure.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
