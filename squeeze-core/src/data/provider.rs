//! Market-data and symbol-master abstractions
//!
//! Both collaborators live outside this crate; the `shared` crate carries the
//! HTTP and CSV implementations.

use crate::data::{DailyBar, Instrument, SymbolRecord};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// History window requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lookback {
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl Lookback {
    /// Range token understood by the chart endpoint
    pub fn as_range(&self) -> &'static str {
        match self {
            Lookback::ThreeMonths => "3mo",
            Lookback::SixMonths => "6mo",
            Lookback::OneYear => "1y",
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_range())
    }
}

impl FromStr for Lookback {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "3mo" | "3m" => Ok(Lookback::ThreeMonths),
            "6mo" | "6m" => Ok(Lookback::SixMonths),
            "1y" | "12mo" => Ok(Lookback::OneYear),
            other => Err(anyhow::anyhow!("Unsupported lookback: {} (expected 3mo, 6mo or 1y)", other)),
        }
    }
}

/// Errors returned by a bar provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The provider does not know the symbol or has no history for it
    #[error("symbol not found: {0}")]
    NotFound(String),
    /// Connection failure or an unexpected HTTP status
    #[error("network error: {0}")]
    Network(String),
    /// Request exceeded its deadline
    #[error("timed out after {0}s")]
    Timeout(u64),
    /// Payload could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Data-unavailable errors count as a non-match rather than a failure
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Daily history source
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Fetch chronological daily bars for a symbol over the lookback window
    async fn daily_bars(
        &self,
        symbol: &SymbolRecord,
        lookback: Lookback,
    ) -> std::result::Result<Vec<DailyBar>, FetchError>;
}

/// Static reference table of instruments
pub trait SymbolMaster: Send + Sync {
    /// Return every instrument known to the master
    fn instruments(&self) -> Result<Vec<Instrument>>;
}
