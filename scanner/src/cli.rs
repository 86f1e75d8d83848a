use clap::{Args, Parser, Subcommand, ValueEnum};
use shared::Config;
use squeeze_core::config::{Containment, Preset};
use squeeze_core::data::Lookback;

use crate::commands;

#[derive(Parser)]
#[command(name = "scanner")]
#[command(about = "Squeeze-then-breakout screener for TWSE and TPEx equities", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "LOG_JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the universe for fresh breakouts
    Scan(ScanArgs),
    /// List the built-in presets
    Presets,
    /// Show build information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Starting preset: classic, loose, momentum or liquid
    #[arg(short, long)]
    pub preset: Option<Preset>,

    /// History window: 3mo, 6mo or 1y
    #[arg(short, long)]
    pub lookback: Option<Lookback>,

    /// Symbols evaluated concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// strict (close < band) or inclusive (close <= band) during the squeeze
    #[arg(long)]
    pub containment: Option<Containment>,

    /// Required excess over the upper band, e.g. 0.005
    #[arg(long)]
    pub breakout_margin: Option<f64>,

    /// Volume must exceed this multiple of its 20-day average
    #[arg(long)]
    pub volume_multiplier: Option<f64>,

    /// Minimum 20-day average volume in shares, 0 to disable
    #[arg(long)]
    pub liquidity_floor: Option<f64>,

    /// Per-symbol deadline in seconds
    #[arg(long)]
    pub symbol_timeout: Option<u64>,

    /// Only scan these codes (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    /// Command line values take precedence over the environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(preset) = self.preset {
            config.preset = preset;
        }
        if self.lookback.is_some() {
            config.lookback = self.lookback;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if self.containment.is_some() {
            config.containment = self.containment;
        }
        if self.breakout_margin.is_some() {
            config.breakout_margin = self.breakout_margin;
        }
        if self.volume_multiplier.is_some() {
            config.volume_multiplier = self.volume_multiplier;
        }
        if self.liquidity_floor.is_some() {
            config.liquidity_floor = self.liquidity_floor;
        }
        if self.symbol_timeout.is_some() {
            config.symbol_timeout_secs = self.symbol_timeout;
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Scan(args) => commands::scan::run(args).await,
        Commands::Presets => commands::presets::run(),
        Commands::Version => commands::version::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::try_parse_from([
            "scanner",
            "scan",
            "--preset",
            "momentum",
            "--lookback",
            "6mo",
            "--containment",
            "inclusive",
            "--symbols",
            "2330,2317",
            "--output",
            "json",
        ])
        .unwrap();

        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.preset, Some(Preset::Momentum));
        assert_eq!(args.lookback, Some(Lookback::SixMonths));
        assert_eq!(args.containment, Some(Containment::Inclusive));
        assert_eq!(args.symbols, vec!["2330", "2317"]);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_flags_override_environment() {
        let mut config = Config::from_lookup(|key| match key {
            "SCAN_PRESET" => Some("liquid".to_string()),
            "SCAN_WORKERS" => Some("4".to_string()),
            _ => None,
        })
        .unwrap();

        let cli = Cli::try_parse_from(["scanner", "scan", "--workers", "8", "--liquidity-floor", "0"]).unwrap();
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        args.apply(&mut config);

        let scan = config.scan_config().unwrap();
        assert_eq!(scan.preset, Preset::Liquid);
        assert_eq!(scan.workers, 8);
        assert_eq!(scan.policy.liquidity_floor, None);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        assert!(Cli::try_parse_from(["scanner", "scan", "--preset", "yolo"]).is_err());
    }
}
