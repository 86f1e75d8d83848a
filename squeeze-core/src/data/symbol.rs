//! Symbol and instrument metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading venue of a tracked equity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    /// Taiwan Stock Exchange (上市)
    Listed,
    /// Taipei Exchange over-the-counter board (上櫃)
    OverTheCounter,
}

impl Venue {
    /// Suffix used by the quote provider for this venue
    pub fn provider_suffix(&self) -> &'static str {
        match self {
            Venue::Listed => ".TW",
            Venue::OverTheCounter => ".TWO",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Listed => write!(f, "TWSE"),
            Venue::OverTheCounter => write!(f, "TPEx"),
        }
    }
}

/// Market column of the symbol master
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    Listed,
    OverTheCounter,
    Emerging,
    Other(String),
}

impl Market {
    /// Parse a market label; both the exchange's Chinese labels and English aliases are accepted
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "上市" => Market::Listed,
            "上櫃" => Market::OverTheCounter,
            "興櫃" => Market::Emerging,
            other => match other.to_lowercase().as_str() {
                "listed" | "twse" => Market::Listed,
                "otc" | "tpex" | "over_the_counter" => Market::OverTheCounter,
                "emerging" => Market::Emerging,
                _ => Market::Other(other.to_string()),
            },
        }
    }

    /// Venue for the two tracked markets
    pub fn venue(&self) -> Option<Venue> {
        match self {
            Market::Listed => Some(Venue::Listed),
            Market::OverTheCounter => Some(Venue::OverTheCounter),
            _ => None,
        }
    }
}

/// Instrument type column of the symbol master
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentKind {
    Equity,
    Etf,
    Warrant,
    Other(String),
}

impl InstrumentKind {
    /// Parse an instrument type label
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            "股票" => InstrumentKind::Equity,
            "ETF" | "ETN" => InstrumentKind::Etf,
            l if l.contains("權證") => InstrumentKind::Warrant,
            other => match other.to_lowercase().as_str() {
                "equity" | "stock" => InstrumentKind::Equity,
                "etf" | "etn" => InstrumentKind::Etf,
                "warrant" => InstrumentKind::Warrant,
                _ => InstrumentKind::Other(other.to_string()),
            },
        }
    }
}

/// One row of the symbol master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub code: String,
    pub name: String,
    /// Industry group, e.g. 半導體業
    pub group: String,
    pub market: Market,
    pub kind: InstrumentKind,
}

/// A tradable equity in the scan universe
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub code: String,
    pub name: String,
    pub sector: String,
    pub venue: Venue,
}

impl SymbolRecord {
    /// Create a new symbol record
    pub fn new(code: impl Into<String>, name: impl Into<String>, sector: impl Into<String>, venue: Venue) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            sector: sector.into(),
            venue,
        }
    }

    /// Venue-qualified symbol, e.g. `2330.TW` or `6488.TWO`
    pub fn provider_symbol(&self) -> String {
        format!("{}{}", self.code, self.venue.provider_suffix())
    }
}

impl fmt::Display for SymbolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.name)
    }
}
