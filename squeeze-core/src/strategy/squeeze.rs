//! Squeeze-then-breakout rule set
//!
//! Today's bar must close above the upper Bollinger band (plus margin) on
//! above-average volume, after `containment_days` sessions that all closed
//! inside the band.

use crate::config::ScreenPolicy;
use crate::data::DailyBar;
use crate::indicators::{calculate_bands, calculate_sma};
use crate::strategy::{Breakout, Rejection};
use crate::Result;
use tracing::debug;

/// Stateless evaluator of the breakout rules for one bar series
#[derive(Debug, Clone)]
pub struct SqueezeBreakout {
    policy: ScreenPolicy,
}

impl SqueezeBreakout {
    /// Create the rule set, rejecting thresholds that cannot produce a band
    pub fn new(policy: ScreenPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &ScreenPolicy {
        &self.policy
    }

    /// Apply every predicate to a chronological bar slice.
    ///
    /// The last bar is "today". Returns the breakout figures, or the first
    /// predicate that failed.
    pub fn screen(&self, bars: &[DailyBar]) -> std::result::Result<Breakout, Rejection> {
        let policy = &self.policy;
        let need = policy.required_bars();
        if bars.len() < need {
            return Err(Rejection::InsufficientHistory {
                have: bars.len(),
                need,
            });
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
        let bands = calculate_bands(&closes, policy.band_period, policy.band_width)
            .map_err(|_| Rejection::BandUnavailable)?;
        let volume_ma =
            calculate_sma(&volumes, policy.band_period).map_err(|_| Rejection::BandUnavailable)?;

        let today = bars.len() - 1;

        for days_ago in 1..=policy.containment_days {
            let i = today - days_ago;
            let upper = bands[i].map(|b| b.upper).ok_or(Rejection::BandUnavailable)?;
            if !policy.containment.holds(closes[i], upper) {
                return Err(Rejection::NotContained {
                    days_ago,
                    close: closes[i],
                    upper,
                });
            }
        }

        let close = closes[today];
        let upper = bands[today].map(|b| b.upper).ok_or(Rejection::BandUnavailable)?;
        let threshold = upper * (1.0 + policy.breakout_margin);
        if !(close > threshold) {
            return Err(Rejection::NoBreakout { close, threshold });
        }

        let volume_average = volume_ma[today].ok_or(Rejection::BandUnavailable)?;
        if !volume_average.is_finite() || volume_average <= f64::EPSILON {
            return Err(Rejection::DegenerateVolume);
        }

        let volume = bars[today].volume;
        let required = volume_average * policy.volume_multiplier;
        if !(volume as f64 > required) {
            return Err(Rejection::WeakVolume { volume, required });
        }

        if let Some(floor) = policy.liquidity_floor {
            if !(volume_average > floor) {
                return Err(Rejection::Illiquid {
                    average: volume_average,
                    floor,
                });
            }
        }

        let prev_close = closes[today - 1];
        if !(prev_close.is_finite() && prev_close > 0.0) {
            return Err(Rejection::DegeneratePrice);
        }

        let breakout = Breakout {
            as_of: bars[today].date,
            close,
            prev_close,
            upper_band: upper,
            volume,
            volume_average,
            percent_change: (close / prev_close - 1.0) * 100.0,
            volume_multiple: volume as f64 / volume_average,
        };
        debug!(
            "Breakout on {}: close={:.2}, upper={:.2}, volume x{:.2}",
            breakout.as_of, close, upper, breakout.volume_multiple
        );
        Ok(breakout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Containment, Preset};
    use chrono::{Duration, NaiveDate};

    fn bars(closes: &[f64], volumes: &[u64]) -> Vec<DailyBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| DailyBar::new(start + Duration::days(i as i64), c, v))
            .collect()
    }

    /// 100 x20, 95 x4, breakout at 130 on three times the average volume
    fn squeeze_series() -> (Vec<f64>, Vec<u64>) {
        let mut closes = vec![100.0; 20];
        closes.extend([95.0; 4]);
        closes.push(130.0);
        let mut volumes = vec![17_000u64; 24];
        volumes.push(57_000);
        (closes, volumes)
    }

    fn rule(preset: Preset) -> SqueezeBreakout {
        SqueezeBreakout::new(preset.policy()).unwrap()
    }

    #[test]
    fn test_squeeze_then_breakout_matches() {
        let (closes, volumes) = squeeze_series();
        let breakout = rule(Preset::Classic).screen(&bars(&closes, &volumes)).unwrap();

        assert!((breakout.percent_change - 36.842).abs() < 0.01);
        assert!((breakout.volume_multiple - 3.0).abs() < 1e-9);
        assert_eq!(breakout.volume_average, 19_000.0);
        assert_eq!(breakout.prev_close, 95.0);
        // window 15x100, 4x95, 130: mean 100.5, sample variance 995/19
        let expected_upper = 100.5 + 2.0 * (995.0f64 / 19.0).sqrt();
        assert!((breakout.upper_band - expected_upper).abs() < 1e-9);
    }

    #[test]
    fn test_broken_containment() {
        let (mut closes, volumes) = squeeze_series();
        closes[22] = 110.0;
        let result = rule(Preset::Classic).screen(&bars(&closes, &volumes));
        assert!(matches!(result, Err(Rejection::NotContained { days_ago: 2, .. })));
    }

    #[test]
    fn test_no_breakout() {
        let (mut closes, volumes) = squeeze_series();
        closes[24] = 100.0;
        let result = rule(Preset::Classic).screen(&bars(&closes, &volumes));
        assert!(matches!(result, Err(Rejection::NoBreakout { .. })));
    }

    #[test]
    fn test_breakout_margin() {
        let (closes, volumes) = squeeze_series();
        let series = bars(&closes, &volumes);

        let mut policy = Preset::Classic.policy();
        policy.breakout_margin = 0.2;
        let wide = SqueezeBreakout::new(policy).unwrap();
        assert!(matches!(wide.screen(&series), Err(Rejection::NoBreakout { .. })));

        assert!(rule(Preset::Momentum).screen(&series).is_ok());
    }

    #[test]
    fn test_weak_volume() {
        let (closes, mut volumes) = squeeze_series();
        volumes[24] = 17_000;
        let result = rule(Preset::Classic).screen(&bars(&closes, &volumes));
        assert!(matches!(result, Err(Rejection::WeakVolume { volume: 17_000, .. })));

        // volume equal to the average is not "above" it, even with a 1.0 multiplier
        let result = rule(Preset::Loose).screen(&bars(&closes, &volumes));
        assert!(matches!(result, Err(Rejection::WeakVolume { .. })));
    }

    #[test]
    fn test_liquidity_floor() {
        let (closes, volumes) = squeeze_series();
        let result = rule(Preset::Liquid).screen(&bars(&closes, &volumes));
        assert!(matches!(result, Err(Rejection::Illiquid { .. })));

        let scaled: Vec<u64> = volumes.iter().map(|v| v * 100).collect();
        let breakout = rule(Preset::Liquid).screen(&bars(&closes, &scaled)).unwrap();
        assert!((breakout.volume_multiple - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_volume_is_degenerate() {
        let (closes, _) = squeeze_series();
        let result = rule(Preset::Classic).screen(&bars(&closes, &[0; 25]));
        assert_eq!(result, Err(Rejection::DegenerateVolume));
    }

    #[test]
    fn test_insufficient_history() {
        let (closes, volumes) = squeeze_series();
        let result = rule(Preset::Classic).screen(&bars(&closes[1..], &volumes[1..]));
        assert_eq!(result, Err(Rejection::InsufficientHistory { have: 24, need: 25 }));

        let result = rule(Preset::Classic).screen(&[]);
        assert_eq!(result, Err(Rejection::InsufficientHistory { have: 0, need: 25 }));
    }

    #[test]
    fn test_close_on_band_boundary() {
        // flat closes make the band equal to the close on every squeeze day
        let mut closes = vec![100.0; 24];
        closes.push(130.0);
        let (_, volumes) = squeeze_series();
        let series = bars(&closes, &volumes);

        let strict = rule(Preset::Classic).screen(&series);
        assert!(matches!(
            strict,
            Err(Rejection::NotContained { days_ago: 1, close, upper }) if close == upper
        ));

        let loose = rule(Preset::Loose);
        assert_eq!(loose.policy().containment, Containment::Inclusive);
        let breakout = loose.screen(&series).unwrap();
        assert!((breakout.percent_change - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_figures_ignore_earlier_squeeze_days() {
        let (closes, volumes) = squeeze_series();
        let base = rule(Preset::Classic).screen(&bars(&closes, &volumes)).unwrap();

        let mut shifted = closes.clone();
        shifted[21] = 96.0;
        shifted[22] = 94.0;
        let other = rule(Preset::Classic).screen(&bars(&shifted, &volumes)).unwrap();

        assert_eq!(base.percent_change, other.percent_change);
        assert_eq!(base.volume_multiple, other.volume_multiple);
    }
}
