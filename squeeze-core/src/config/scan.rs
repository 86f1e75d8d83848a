//! Scan run configuration

use crate::config::{Preset, ScreenPolicy};
use crate::data::Lookback;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on concurrent evaluations
pub const MAX_WORKERS: usize = 256;

/// Everything a scan needs besides its collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Preset the thresholds started from
    pub preset: Preset,
    /// History window requested per symbol
    pub lookback: Lookback,
    /// Maximum number of symbols evaluated at once
    pub workers: usize,
    /// Deadline for fetching and evaluating one symbol, in seconds
    pub symbol_timeout_secs: u64,
    /// Rule thresholds
    pub policy: ScreenPolicy,
}

impl ScanConfig {
    /// Configuration reproducing one of the named variants
    pub fn from_preset(preset: Preset) -> Self {
        let (lookback, workers) = match preset {
            Preset::Classic => (Lookback::ThreeMonths, 10),
            Preset::Loose => (Lookback::SixMonths, 10),
            Preset::Momentum => (Lookback::OneYear, 20),
            Preset::Liquid => (Lookback::SixMonths, 20),
        };
        Self {
            preset,
            lookback,
            workers,
            symbol_timeout_secs: 30,
            policy: preset.policy(),
        }
    }

    /// Per-symbol deadline
    pub fn symbol_timeout(&self) -> Duration {
        Duration::from_secs(self.symbol_timeout_secs)
    }

    /// Validate worker count, timeout and thresholds
    pub fn validate(&self) -> crate::Result<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            anyhow::bail!("workers must be between 1 and {}, got {}", MAX_WORKERS, self.workers);
        }
        if self.symbol_timeout_secs == 0 {
            anyhow::bail!("symbol_timeout_secs must be at least 1");
        }
        self.policy.validate()
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Classic)
    }
}
