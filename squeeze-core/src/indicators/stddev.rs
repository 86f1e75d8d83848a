//! Rolling sample standard deviation

use crate::indicators::Indicator;
use std::collections::VecDeque;

/// Trailing-window standard deviation using the n-1 denominator.
///
/// `ta::indicators::StandardDeviation` divides by n, which gives a narrower
/// band than the rolling convention the screener is calibrated against.
#[derive(Debug, Clone)]
pub struct SampleStdDev {
    period: usize,
    window: VecDeque<f64>,
    last_value: Option<f64>,
}

impl SampleStdDev {
    /// Create new indicator; periods below 2 never become ready
    pub fn new(period: usize) -> Self {
        Self {
            period,
            window: VecDeque::with_capacity(period),
            last_value: None,
        }
    }

    /// Get period
    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for SampleStdDev {
    fn name(&self) -> &str {
        "SampleStdDev"
    }

    fn update(&mut self, value: f64) {
        if self.period < 2 {
            return;
        }
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(value);

        if self.window.len() == self.period {
            let n = self.period as f64;
            let mean = self.window.iter().sum::<f64>() / n;
            let sum_sq: f64 = self.window.iter().map(|x| (x - mean).powi(2)).sum();
            self.last_value = Some((sum_sq / (n - 1.0)).sqrt());
        }
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.last_value.is_some()
    }
}

/// Calculate rolling sample standard deviation over a series
pub fn calculate_sample_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut std = SampleStdDev::new(period);
    values
        .iter()
        .map(|&v| {
            std.update(v);
            std.value()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_std_known_values() {
        // 2, 4, 4, 4, 5, 5, 7, 9: mean 5, sum of squares 32, sample variance 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = calculate_sample_std(&values, 8);
        assert!(std[..7].iter().all(|v| v.is_none()));
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((std[7].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_flat_series_is_exactly_zero() {
        let values = [100.0; 25];
        let std = calculate_sample_std(&values, 20);
        assert_eq!(std[19], Some(0.0));
        assert_eq!(std[24], Some(0.0));
    }

    #[test]
    fn test_window_rolls() {
        let values = [1.0, 2.0, 3.0, 10.0];
        let std = calculate_sample_std(&values, 3);
        assert_eq!(std[2], Some(1.0));
        // window 2, 3, 10: mean 5, squares 9 + 4 + 25 = 38
        assert!((std[3].unwrap() - 19.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_period_never_ready() {
        let mut std = SampleStdDev::new(1);
        std.update(1.0);
        std.update(2.0);
        assert!(!std.is_ready());
    }
}
