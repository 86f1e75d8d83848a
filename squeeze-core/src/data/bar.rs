//! Daily bar data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading session of close price and volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date in the exchange time zone
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
    /// Traded volume in shares
    pub volume: u64,
}

impl DailyBar {
    /// Create a new bar
    pub fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self { date, close, volume }
    }

    /// Build a bar from a provider row, dropping rows with missing or unusable fields
    pub fn from_row(date: NaiveDate, close: Option<f64>, volume: Option<u64>) -> Option<Self> {
        let close = close.filter(|c| c.is_finite() && *c > 0.0)?;
        Some(Self::new(date, close, volume?))
    }
}

/// Chronological collection of daily bars for one symbol
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<DailyBar>,
}

impl BarSeries {
    /// Create new empty series
    pub fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Create from bars in any order.
    ///
    /// Bars are sorted by date; when a provider repeats a date the later row
    /// wins, which matches how intraday snapshots of today's session get
    /// superseded by the final print.
    pub fn from_vec(mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<DailyBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    /// Get number of bars
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if series is empty
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get last bar
    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    /// Get all bars
    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    /// Get close prices as vector
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Get volumes as vector
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }
}

impl From<Vec<DailyBar>> for BarSeries {
    fn from(bars: Vec<DailyBar>) -> Self {
        Self::from_vec(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_from_row_drops_missing_fields() {
        assert!(DailyBar::from_row(day(1), None, Some(100)).is_none());
        assert!(DailyBar::from_row(day(1), Some(10.0), None).is_none());
        assert!(DailyBar::from_row(day(1), Some(f64::NAN), Some(100)).is_none());
        assert!(DailyBar::from_row(day(1), Some(0.0), Some(100)).is_none());
        assert_eq!(
            DailyBar::from_row(day(1), Some(10.0), Some(100)),
            Some(DailyBar::new(day(1), 10.0, 100))
        );
    }

    #[test]
    fn test_series_sorted_and_deduped() {
        let series = BarSeries::from_vec(vec![
            DailyBar::new(day(3), 12.0, 300),
            DailyBar::new(day(1), 10.0, 100),
            DailyBar::new(day(3), 13.0, 350),
            DailyBar::new(day(2), 11.0, 200),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 13.0]);
        assert_eq!(series.volumes(), vec![100.0, 200.0, 350.0]);
        assert_eq!(series.last().map(|b| b.date), Some(day(3)));
    }
}
