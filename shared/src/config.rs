use anyhow::{Context, Result};
use dotenv::dotenv;
use squeeze_core::config::{Containment, Preset, ScanConfig};
use squeeze_core::data::Lookback;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub preset: Preset,
    pub lookback: Option<Lookback>,
    pub workers: Option<usize>,
    pub symbol_timeout_secs: Option<u64>,
    pub containment: Option<Containment>,
    pub breakout_margin: Option<f64>,
    pub volume_multiplier: Option<f64>,
    /// Minimum 20-day average volume in shares; 0 disables the floor
    pub liquidity_floor: Option<f64>,
    pub http_timeout_secs: u64,
    pub yahoo_base_url: String,
    pub twse_equities_csv: PathBuf,
    pub tpex_equities_csv: PathBuf,
    pub api_bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults, malformed ones are errors
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Config {
            preset: parse_opt(&var, "SCAN_PRESET")?.unwrap_or(Preset::Classic),
            lookback: parse_opt(&var, "SCAN_LOOKBACK")?,
            workers: parse_opt(&var, "SCAN_WORKERS")?,
            symbol_timeout_secs: parse_opt(&var, "SCAN_SYMBOL_TIMEOUT_SECS")?,
            containment: parse_opt(&var, "SCAN_CONTAINMENT")?,
            breakout_margin: parse_opt(&var, "SCAN_BREAKOUT_MARGIN")?,
            volume_multiplier: parse_opt(&var, "SCAN_VOLUME_MULTIPLIER")?,
            liquidity_floor: parse_opt(&var, "SCAN_LIQUIDITY_FLOOR")?,
            http_timeout_secs: parse_opt(&var, "HTTP_TIMEOUT_SECS")?.unwrap_or(15),
            yahoo_base_url: var("YAHOO_BASE_URL")
                .unwrap_or_else(|| "https://query1.finance.yahoo.com".to_string()),
            twse_equities_csv: var("TWSE_EQUITIES_CSV")
                .unwrap_or_else(|| "data/twse_equities.csv".to_string())
                .into(),
            tpex_equities_csv: var("TPEX_EQUITIES_CSV")
                .unwrap_or_else(|| "data/tpex_equities.csv".to_string())
                .into(),
            api_bind_addr: var("API_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:9999".to_string()),
        })
    }

    /// Preset defaults with every configured override applied
    pub fn scan_config(&self) -> Result<ScanConfig> {
        let mut config = ScanConfig::from_preset(self.preset);
        if let Some(lookback) = self.lookback {
            config.lookback = lookback;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(secs) = self.symbol_timeout_secs {
            config.symbol_timeout_secs = secs;
        }
        if let Some(containment) = self.containment {
            config.policy.containment = containment;
        }
        if let Some(margin) = self.breakout_margin {
            config.policy.breakout_margin = margin;
        }
        if let Some(k) = self.volume_multiplier {
            config.policy.volume_multiplier = k;
        }
        if let Some(floor) = self.liquidity_floor {
            config.policy.liquidity_floor = if floor == 0.0 { None } else { Some(floor) };
        }
        config.validate().context("Invalid scan configuration")?;
        Ok(config)
    }

    pub fn symbol_files(&self) -> Vec<PathBuf> {
        vec![self.twse_equities_csv.clone(), self.tpex_equities_csv.clone()]
    }
}

fn parse_opt<T, V>(var: &V, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {}={}: {}", key, raw, e)),
        None => Ok(None),
    }
}
