pub mod config;
pub mod symbols;
pub mod yahoo;

pub use config::Config;
pub use symbols::CsvSymbolMaster;
pub use yahoo::YahooChartClient;
