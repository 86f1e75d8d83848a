//! Scan report generation

use crate::config::Preset;
use crate::strategy::{EvalFailure, MatchRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use uuid::Uuid;

const CHART_WIDTH: usize = 30;

/// Number of matches in one sector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorCount {
    pub sector: String,
    pub count: usize,
}

/// Result of one full scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub id: Uuid,
    pub preset: Preset,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Symbols in the universe
    pub total: usize,
    /// Sorted by volume multiple, descending
    pub matches: Vec<MatchRecord>,
    /// Matches per sector, most frequent first
    pub sector_counts: Vec<SectorCount>,
    /// Non-matches by rejection kind
    pub rejections: BTreeMap<String, usize>,
    /// Symbols whose evaluation failed
    pub failures: Vec<EvalFailure>,
}

impl ScanReport {
    /// Assemble a report; `matches` must already be in output order
    pub fn new(
        preset: Preset,
        started_at: DateTime<Utc>,
        total: usize,
        matches: Vec<MatchRecord>,
        rejections: BTreeMap<String, usize>,
        failures: Vec<EvalFailure>,
    ) -> Self {
        let sector_counts = Self::count_sectors(&matches);
        Self {
            id: Uuid::new_v4(),
            preset,
            started_at,
            completed_at: Utc::now(),
            total,
            matches,
            sector_counts,
            rejections,
            failures,
        }
    }

    /// "No matches today"
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn duration_secs(&self) -> f64 {
        (self.completed_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Frequency of matches per sector, descending by count then by name
    pub fn count_sectors(matches: &[MatchRecord]) -> Vec<SectorCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in matches {
            *counts.entry(record.sector.as_str()).or_default() += 1;
        }
        let mut sectors: Vec<SectorCount> = counts
            .into_iter()
            .map(|(sector, count)| SectorCount {
                sector: sector.to_string(),
                count,
            })
            .collect();
        sectors.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.sector.cmp(&b.sector)));
        sectors
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Scanned {} symbols in {:.1}s with preset {}: {} matched, {} failed",
            self.total,
            self.duration_secs(),
            self.preset,
            self.matches.len(),
            self.failed_count()
        )
    }

    /// Format report as a plain-text table with a sector chart
    pub fn format(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Squeeze Breakout Scan ({})", self.preset);
        let _ = writeln!(out, "================================");

        if self.is_empty() {
            let _ = writeln!(out, "No matches today.");
        } else {
            let _ = writeln!(
                out,
                "{:<14} {:<6} {:<10} {:>10} {:>9} {:>8} {:>10}  {}",
                "Sector", "Code", "Name", "Price", "Change", "Volume", "Upper", "As of"
            );
            for m in &self.matches {
                let _ = writeln!(
                    out,
                    "{:<14} {:<6} {:<10} {:>10.2} {:>8.2}% {:>7.2}x {:>10.2}  {}",
                    m.sector, m.code, m.name, m.price, m.percent_change, m.volume_multiple,
                    m.upper_band, m.as_of
                );
            }

            let _ = writeln!(out);
            let _ = writeln!(out, "Sector Frequency");
            let _ = writeln!(out, "----------------");
            let max = self.sector_counts.first().map(|s| s.count).unwrap_or(1).max(1);
            for s in &self.sector_counts {
                let width = (s.count * CHART_WIDTH / max).max(1);
                let _ = writeln!(out, "{:<14} {} {}", s.sector, "█".repeat(width), s.count);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.summary());
        if !self.failures.is_empty() {
            let _ = writeln!(
                out,
                "{} symbol(s) could not be evaluated and were treated as no match.",
                self.failed_count()
            );
        }
        out
    }
}
