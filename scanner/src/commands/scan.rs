use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use shared::{Config, CsvSymbolMaster, YahooChartClient};
use squeeze_core::data::UniverseEnumerator;
use squeeze_core::scan::{ScanDriver, ScanProgress, ScanReport};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::{OutputFormat, ScanArgs};

pub async fn run(args: ScanArgs) -> Result<()> {
    let mut config = Config::from_env()?;
    args.apply(&mut config);
    let scan_config = config.scan_config()?;

    let master = CsvSymbolMaster::from_config(&config);
    let universe = UniverseEnumerator::enumerate(&master).context("Failed to load symbol master")?;
    let universe = UniverseEnumerator::restrict(universe, &args.symbols);
    if universe.is_empty() {
        warn!("Universe is empty; check the symbol master files and --symbols");
    }

    let provider = Arc::new(YahooChartClient::from_config(&config)?);
    let driver = ScanDriver::new(provider, scan_config)?;

    let (progress_tx, mut progress_rx) = ScanProgress::channel(universe.len());
    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(universe.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        pb
    };

    let bar = pb.clone();
    let watcher = tokio::spawn(async move {
        while progress_rx.changed().await.is_ok() {
            let progress = *progress_rx.borrow_and_update();
            bar.set_position(progress.completed as u64);
            bar.set_message(format!("{} matched, {} failed", progress.matched, progress.failed));
        }
    });

    let report = driver.run(universe, &progress_tx).await;
    drop(progress_tx);
    let _ = watcher.await;
    pb.finish_with_message(format!("{} matched", report.matches.len()));

    render(&report, args.output)?;
    info!("Report {} done", report.id);
    Ok(())
}

fn render(report: &ScanReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", report.format()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
