//! Scan universe enumeration

use crate::data::{Instrument, InstrumentKind, SymbolMaster, SymbolRecord};
use crate::Result;
use std::collections::HashSet;
use tracing::info;

/// Builds the tradable equity universe from the symbol master
pub struct UniverseEnumerator;

impl UniverseEnumerator {
    /// All equities on the listed and over-the-counter boards, sorted by code
    pub fn enumerate<M: SymbolMaster + ?Sized>(master: &M) -> Result<Vec<SymbolRecord>> {
        let instruments = master.instruments()?;
        let total = instruments.len();
        let universe = Self::from_instruments(instruments);
        info!("Universe: {} equities out of {} instruments", universe.len(), total);
        Ok(universe)
    }

    /// Filter and normalise raw instruments
    pub fn from_instruments(instruments: Vec<Instrument>) -> Vec<SymbolRecord> {
        let mut seen = HashSet::new();
        let mut universe: Vec<SymbolRecord> = instruments
            .into_iter()
            .filter(|i| i.kind == InstrumentKind::Equity)
            .filter_map(|i| {
                let venue = i.market.venue()?;
                Some(SymbolRecord::new(i.code.trim(), i.name.trim(), i.group.trim(), venue))
            })
            .filter(|s| seen.insert(s.code.clone()))
            .collect();
        universe.sort_by(|a, b| a.code.cmp(&b.code));
        universe
    }

    /// Restrict a universe to an explicit list of codes, keeping universe order
    pub fn restrict(universe: Vec<SymbolRecord>, codes: &[String]) -> Vec<SymbolRecord> {
        if codes.is_empty() {
            return universe;
        }
        let wanted: HashSet<&str> = codes.iter().map(|c| c.trim()).collect();
        universe
            .into_iter()
            .filter(|s| wanted.contains(s.code.as_str()))
            .collect()
    }
}
