//! Evaluation outcomes and match records

use crate::data::{SymbolRecord, Venue};
use crate::round2;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw figures of a confirmed breakout, before rounding
#[derive(Debug, Clone, PartialEq)]
pub struct Breakout {
    pub as_of: NaiveDate,
    pub close: f64,
    pub prev_close: f64,
    pub upper_band: f64,
    pub volume: u64,
    pub volume_average: f64,
    pub percent_change: f64,
    pub volume_multiple: f64,
}

/// Label attached to every match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakoutStatus {
    /// First close above the band after the squeeze
    FirstBreakout,
}

impl fmt::Display for BreakoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakoutStatus::FirstBreakout => write!(f, "first breakout"),
        }
    }
}

/// One row of the result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub sector: String,
    pub code: String,
    pub name: String,
    pub venue: Venue,
    /// Today's close
    pub price: f64,
    /// Change against the previous close, in percent
    pub percent_change: f64,
    /// Today's volume over the 20-day volume average
    pub volume_multiple: f64,
    /// Upper band today
    pub upper_band: f64,
    pub as_of: NaiveDate,
    pub status: BreakoutStatus,
}

impl MatchRecord {
    /// Build the reported row; every figure is rounded to two decimals
    pub fn new(symbol: &SymbolRecord, breakout: &Breakout) -> Self {
        Self {
            sector: symbol.sector.clone(),
            code: symbol.code.clone(),
            name: symbol.name.clone(),
            venue: symbol.venue,
            price: round2(breakout.close),
            percent_change: round2(breakout.percent_change),
            volume_multiple: round2(breakout.volume_multiple),
            upper_band: round2(breakout.upper_band),
            as_of: breakout.as_of,
            status: BreakoutStatus::FirstBreakout,
        }
    }
}

/// Why a symbol did not match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The provider has no data for the symbol
    Unavailable { detail: String },
    InsufficientHistory { have: usize, need: usize },
    /// Band could not be computed on one of the evaluated sessions
    BandUnavailable,
    /// `days_ago` sessions before today closed outside the band
    NotContained { days_ago: usize, close: f64, upper: f64 },
    NoBreakout { close: f64, threshold: f64 },
    WeakVolume { volume: u64, required: f64 },
    Illiquid { average: f64, floor: f64 },
    /// Average volume is zero or not a finite number
    DegenerateVolume,
    /// Previous close cannot be used as a divisor
    DegeneratePrice,
}

impl Rejection {
    /// Stable short name used for tallies
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::Unavailable { .. } => "unavailable",
            Rejection::InsufficientHistory { .. } => "insufficient_history",
            Rejection::BandUnavailable => "band_unavailable",
            Rejection::NotContained { .. } => "not_contained",
            Rejection::NoBreakout { .. } => "no_breakout",
            Rejection::WeakVolume { .. } => "weak_volume",
            Rejection::Illiquid { .. } => "illiquid",
            Rejection::DegenerateVolume => "degenerate_volume",
            Rejection::DegeneratePrice => "degenerate_price",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Unavailable { detail } => write!(f, "no data: {}", detail),
            Rejection::InsufficientHistory { have, need } => {
                write!(f, "only {} bars, need {}", have, need)
            }
            Rejection::BandUnavailable => write!(f, "band unavailable"),
            Rejection::NotContained { days_ago, close, upper } => write!(
                f,
                "close {:.2} outside band {:.2} {} day(s) ago",
                close, upper, days_ago
            ),
            Rejection::NoBreakout { close, threshold } => {
                write!(f, "close {:.2} not above {:.2}", close, threshold)
            }
            Rejection::WeakVolume { volume, required } => {
                write!(f, "volume {} not above {:.0}", volume, required)
            }
            Rejection::Illiquid { average, floor } => {
                write!(f, "average volume {:.0} below floor {:.0}", average, floor)
            }
            Rejection::DegenerateVolume => write!(f, "average volume is zero"),
            Rejection::DegeneratePrice => write!(f, "previous close unusable"),
        }
    }
}

/// A symbol whose evaluation could not complete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalFailure {
    pub code: String,
    pub error: String,
}

impl EvalFailure {
    pub fn new(symbol: &SymbolRecord, error: impl fmt::Display) -> Self {
        Self {
            code: symbol.code.clone(),
            error: error.to_string(),
        }
    }
}

/// Result of evaluating one symbol
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Matched(MatchRecord),
    NoMatch(Rejection),
    Failed(EvalFailure),
}

impl Outcome {
    /// Collapse to the match-or-nothing view; failures read as no match
    pub fn into_match(self) -> Option<MatchRecord> {
        match self {
            Outcome::Matched(record) => Some(record),
            Outcome::NoMatch(_) | Outcome::Failed(_) => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Outcome::Matched(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}
