//! Screening policy configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a close sitting exactly on the upper band is treated during the squeeze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// `close < upper`
    Strict,
    /// `close <= upper`
    Inclusive,
}

impl Containment {
    /// Whether a close counts as contained by the band
    pub fn holds(&self, close: f64, upper: f64) -> bool {
        match self {
            Containment::Strict => close < upper,
            Containment::Inclusive => close <= upper,
        }
    }
}

impl FromStr for Containment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Containment::Strict),
            "inclusive" | "loose" => Ok(Containment::Inclusive),
            other => Err(anyhow::anyhow!("Unknown containment mode: {}", other)),
        }
    }
}

impl fmt::Display for Containment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Containment::Strict => write!(f, "strict"),
            Containment::Inclusive => write!(f, "inclusive"),
        }
    }
}

/// Thresholds of the squeeze/breakout rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenPolicy {
    /// Moving-average window for the band and the volume average
    pub band_period: usize,
    /// Standard deviations above the mean for the upper band
    pub band_width: f64,
    /// Number of sessions before today that must stay inside the band
    pub containment_days: usize,
    /// Minimum number of bars the provider must return
    pub min_bars: usize,
    pub containment: Containment,
    /// Required excess over the upper band, e.g. 0.005 = 0.5%
    pub breakout_margin: f64,
    /// Today's volume must exceed the volume average times this factor
    pub volume_multiplier: f64,
    /// Minimum volume average in shares, if any
    pub liquidity_floor: Option<f64>,
}

impl ScreenPolicy {
    /// Bars needed so the band exists on today and every containment day
    pub fn required_bars(&self) -> usize {
        self.min_bars.max(self.band_period + self.containment_days)
    }

    /// Check thresholds for values that would make every scan meaningless
    pub fn validate(&self) -> crate::Result<()> {
        if self.band_period < 2 {
            anyhow::bail!("band_period must be at least 2");
        }
        if self.containment_days == 0 {
            anyhow::bail!("containment_days must be at least 1");
        }
        if !(self.band_width.is_finite() && self.band_width > 0.0) {
            anyhow::bail!("band_width must be positive");
        }
        if !(self.breakout_margin.is_finite() && self.breakout_margin >= 0.0) {
            anyhow::bail!("breakout_margin must be zero or positive");
        }
        if !(self.volume_multiplier.is_finite() && self.volume_multiplier > 0.0) {
            anyhow::bail!("volume_multiplier must be positive");
        }
        if let Some(floor) = self.liquidity_floor {
            if !(floor.is_finite() && floor >= 0.0) {
                anyhow::bail!("liquidity_floor must be zero or positive");
            }
        }
        Ok(())
    }
}

impl Default for ScreenPolicy {
    fn default() -> Self {
        Preset::Classic.policy()
    }
}

/// Named bundles of thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// 3 months, strict squeeze, 0.5% margin, 1.2x volume
    Classic,
    /// 6 months, inclusive squeeze, no margin, 1.0x volume
    Loose,
    /// 1 year, strict squeeze, no margin, 1.3x volume
    Momentum,
    /// 6 months, strict squeeze, 0.5% margin, 1.2x volume, 500k share floor
    Liquid,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Classic, Preset::Loose, Preset::Momentum, Preset::Liquid];

    /// Rule thresholds of this preset
    pub fn policy(&self) -> ScreenPolicy {
        let base = ScreenPolicy {
            band_period: 20,
            band_width: 2.0,
            containment_days: 4,
            min_bars: 25,
            containment: Containment::Strict,
            breakout_margin: 0.005,
            volume_multiplier: 1.2,
            liquidity_floor: None,
        };
        match self {
            Preset::Classic => base,
            Preset::Loose => ScreenPolicy {
                min_bars: 21,
                containment: Containment::Inclusive,
                breakout_margin: 0.0,
                volume_multiplier: 1.0,
                ..base
            },
            Preset::Momentum => ScreenPolicy {
                breakout_margin: 0.0,
                volume_multiplier: 1.3,
                ..base
            },
            Preset::Liquid => ScreenPolicy {
                liquidity_floor: Some(500_000.0),
                ..base
            },
        }
    }

    /// One-line description for listings
    pub fn description(&self) -> &'static str {
        match self {
            Preset::Classic => "3mo history, strict squeeze, breakout 0.5% over band, volume > 1.2x avg",
            Preset::Loose => "6mo history, squeeze may touch band, any close over band, volume > avg",
            Preset::Momentum => "1y history, strict squeeze, any close over band, volume > 1.3x avg",
            Preset::Liquid => "6mo history, classic rules, 20-day avg volume > 500k shares",
        }
    }
}

impl FromStr for Preset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(Preset::Classic),
            "loose" => Ok(Preset::Loose),
            "momentum" => Ok(Preset::Momentum),
            "liquid" => Ok(Preset::Liquid),
            other => Err(anyhow::anyhow!(
                "Unknown preset: {} (expected classic, loose, momentum or liquid)",
                other
            )),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preset::Classic => "classic",
            Preset::Loose => "loose",
            Preset::Momentum => "momentum",
            Preset::Liquid => "liquid",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment_boundary() {
        assert!(!Containment::Strict.holds(100.0, 100.0));
        assert!(Containment::Inclusive.holds(100.0, 100.0));
        assert!(Containment::Strict.holds(99.99, 100.0));
        assert!(!Containment::Inclusive.holds(100.01, 100.0));
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in Preset::ALL {
            preset.policy().validate().unwrap();
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_required_bars() {
        assert_eq!(Preset::Classic.policy().required_bars(), 25);
        // the band must exist on all five sessions even when the preset asks for fewer bars
        assert_eq!(Preset::Loose.policy().required_bars(), 24);
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        let mut policy = ScreenPolicy::default();
        policy.volume_multiplier = 0.0;
        assert!(policy.validate().is_err());

        let mut policy = ScreenPolicy::default();
        policy.breakout_margin = -0.01;
        assert!(policy.validate().is_err());

        let mut policy = ScreenPolicy::default();
        policy.liquidity_floor = Some(f64::NAN);
        assert!(policy.validate().is_err());
    }
}
