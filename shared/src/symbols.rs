//! Symbol master loaded from twstock-style code tables
//!
//! Expected header: `type,code,name,ISIN,start,market,group,CFI`. Columns
//! other than type, code, name, market and group are ignored.

use crate::config::Config;
use anyhow::{Context, Result};
use serde::Deserialize;
use squeeze_core::data::{Instrument, InstrumentKind, Market, SymbolMaster};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct CodeRow {
    #[serde(rename = "type")]
    kind: String,
    code: String,
    name: String,
    market: String,
    #[serde(default)]
    group: String,
}

impl From<CodeRow> for Instrument {
    fn from(row: CodeRow) -> Self {
        Instrument {
            code: row.code,
            name: row.name,
            group: row.group,
            market: Market::from_label(&row.market),
            kind: InstrumentKind::from_label(&row.kind),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvSymbolMaster {
    paths: Vec<PathBuf>,
}

impl CsvSymbolMaster {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.symbol_files())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Parse one code table
    pub fn read_table<R: Read>(reader: R) -> Result<Vec<Instrument>> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut instruments = Vec::new();
        for (line, row) in csv.deserialize::<CodeRow>().enumerate() {
            let row = row.with_context(|| format!("Bad code table row {}", line + 2))?;
            instruments.push(row.into());
        }
        Ok(instruments)
    }

    fn read_file(path: &Path) -> Result<Vec<Instrument>> {
        let file = std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
        let instruments =
            Self::read_table(file).with_context(|| format!("Cannot parse {}", path.display()))?;
        info!("Loaded {} instruments from {}", instruments.len(), path.display());
        Ok(instruments)
    }
}

impl SymbolMaster for CsvSymbolMaster {
    fn instruments(&self) -> Result<Vec<Instrument>> {
        let mut all = Vec::new();
        for path in &self.paths {
            all.extend(Self::read_file(path)?);
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squeeze_core::data::{UniverseEnumerator, Venue};
    use std::io::Write;

    const TWSE: &str = "type,code,name,ISIN,start,market,group,CFI
股票,1101,台泥,TW0001101004,1962/02/09,上市,水泥工業,ESVUFR
股票,2330,台積電,TW0002330008,1994/09/05,上市,半導體業,ESVUFR
ETF,0050,元大台灣50,TW0000050004,2003/06/30,上市,,CEOGEU
上市認購(售)權證,030001,台積電元大4A購01,TW18Z0300014,2024/01/02,上市,,RWSCCE
";

    const TPEX: &str = "type,code,name,ISIN,start,market,group,CFI
股票,6488,環球晶,TW0006488000,2008/09/25,上櫃,半導體業,ESVUFR
股票,7799,禾榮科,TW0007799009,2022/05/05,興櫃,生技醫療業,ESVUFR
";

    #[test]
    fn test_read_table() {
        let instruments = CsvSymbolMaster::read_table(TWSE.as_bytes()).unwrap();
        assert_eq!(instruments.len(), 4);
        assert_eq!(instruments[1].code, "2330");
        assert_eq!(instruments[1].group, "半導體業");
        assert_eq!(instruments[1].kind, InstrumentKind::Equity);
        assert_eq!(instruments[2].kind, InstrumentKind::Etf);
        assert_eq!(instruments[3].kind, InstrumentKind::Warrant);
    }

    #[test]
    fn test_universe_from_files() {
        let mut twse = tempfile::NamedTempFile::new().unwrap();
        twse.write_all(TWSE.as_bytes()).unwrap();
        let mut tpex = tempfile::NamedTempFile::new().unwrap();
        tpex.write_all(TPEX.as_bytes()).unwrap();

        let master = CsvSymbolMaster::new(vec![twse.path().to_path_buf(), tpex.path().to_path_buf()]);
        let universe = UniverseEnumerator::enumerate(&master).unwrap();

        let codes: Vec<&str> = universe.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["1101", "2330", "6488"]);
        assert_eq!(universe[2].venue, Venue::OverTheCounter);
        assert_eq!(universe[2].provider_symbol(), "6488.TWO");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let master = CsvSymbolMaster::new(vec![PathBuf::from("/nonexistent/twse_equities.csv")]);
        let err = master.instruments().unwrap_err();
        assert!(format!("{:#}", err).contains("Cannot open"));
    }
}
