//! Bollinger Bands indicator

use crate::indicators::{Indicator, SampleStdDev, SMA};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Band values for one bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub middle: f64,
    pub std_dev: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Bollinger Bands built from a ta-rs SMA and a sample standard deviation
#[derive(Debug, Clone)]
pub struct BollingerBands {
    sma: SMA,
    std_dev: SampleStdDev,
    multiplier: f64,
    last_output: Option<BandPoint>,
}

impl BollingerBands {
    /// Create new Bollinger Bands indicator
    pub fn new(period: usize, multiplier: f64) -> Result<Self> {
        if period < 2 {
            anyhow::bail!("Bollinger period must be at least 2, got {}", period);
        }
        Ok(Self {
            sma: SMA::new(period)?,
            std_dev: SampleStdDev::new(period),
            multiplier,
            last_output: None,
        })
    }

    /// Get upper band
    pub fn upper(&self) -> Option<f64> {
        self.last_output.map(|o| o.upper)
    }

    /// Get middle band (SMA)
    pub fn middle(&self) -> Option<f64> {
        self.last_output.map(|o| o.middle)
    }

    /// Get lower band
    pub fn lower(&self) -> Option<f64> {
        self.last_output.map(|o| o.lower)
    }

    /// Get the full band for the latest bar
    pub fn band(&self) -> Option<BandPoint> {
        self.last_output
    }
}

impl Indicator for BollingerBands {
    fn name(&self) -> &str {
        "BollingerBands"
    }

    fn update(&mut self, value: f64) {
        self.sma.update(value);
        self.std_dev.update(value);
        if let (Some(middle), Some(std_dev)) = (self.sma.value(), self.std_dev.value()) {
            let width = self.multiplier * std_dev;
            self.last_output = Some(BandPoint {
                middle,
                std_dev,
                upper: middle + width,
                lower: middle - width,
            });
        }
    }

    fn value(&self) -> Option<f64> {
        self.middle()
    }

    fn is_ready(&self) -> bool {
        self.last_output.is_some()
    }
}

/// Calculate the band for every bar of a close series
pub fn calculate_bands(closes: &[f64], period: usize, multiplier: f64) -> Result<Vec<Option<BandPoint>>> {
    let mut bb = BollingerBands::new(period, multiplier)?;
    Ok(closes
        .iter()
        .map(|&close| {
            bb.update(close);
            bb.band()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_is_mean_plus_two_sample_std() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let bands = calculate_bands(&closes, 20, 2.0).unwrap();
        assert!(bands[18].is_none());

        let band = bands[19].unwrap();
        // 1..=20: mean 10.5, sample variance 35
        assert!((band.middle - 10.5).abs() < 1e-9);
        assert!((band.std_dev - 35.0f64.sqrt()).abs() < 1e-9);
        assert!((band.upper - (10.5 + 2.0 * 35.0f64.sqrt())).abs() < 1e-9);
        assert!((band.lower - (10.5 - 2.0 * 35.0f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn test_flat_band_collapses_to_price() {
        let bands = calculate_bands(&[100.0; 22], 20, 2.0).unwrap();
        let band = bands[21].unwrap();
        assert_eq!(band.upper, 100.0);
        assert_eq!(band.lower, 100.0);
    }

    #[test]
    fn test_window_length_changes_band() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 7) as f64).collect();
        let b20 = calculate_bands(&closes, 20, 2.0).unwrap()[29].unwrap();
        let b10 = calculate_bands(&closes, 10, 2.0).unwrap()[29].unwrap();
        assert!((b20.upper - b10.upper).abs() > 1e-9);
    }

    #[test]
    fn test_invalid_period() {
        assert!(BollingerBands::new(1, 2.0).is_err());
    }
}
