//! Parallel scan driver

use crate::config::ScanConfig;
use crate::data::{BarProvider, FetchError, SymbolRecord};
use crate::scan::{ScanProgress, ScanReport};
use crate::strategy::{EvalFailure, MatchRecord, Outcome, SymbolEvaluator};
use crate::Result;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// How often a progress line is logged
const LOG_EVERY: usize = 100;

/// Maps the evaluator over a universe with at most `workers` symbols in flight
pub struct ScanDriver {
    evaluator: Arc<SymbolEvaluator>,
    config: ScanConfig,
}

impl ScanDriver {
    /// Create new driver
    pub fn new(provider: Arc<dyn BarProvider>, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let evaluator = SymbolEvaluator::new(provider, &config)?;
        Ok(Self {
            evaluator: Arc::new(evaluator),
            config,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Evaluate every symbol and return the sorted report.
    ///
    /// `progress` receives a snapshot after each symbol completes, in
    /// completion order. Per-symbol failures never abort the scan.
    pub async fn run(
        &self,
        universe: Vec<SymbolRecord>,
        progress: &watch::Sender<ScanProgress>,
    ) -> ScanReport {
        let started_at = Utc::now();
        let total = universe.len();
        let mut state = ScanProgress::new(total);
        progress.send_replace(state);

        info!(
            "Starting scan of {} symbols (preset={}, lookback={}, workers={})",
            total, self.config.preset, self.config.lookback, self.config.workers
        );

        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let timeout = self.config.symbol_timeout();
        let mut join_set = JoinSet::new();

        for (index, symbol) in universe.into_iter().enumerate() {
            let evaluator = Arc::clone(&self.evaluator);
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => match tokio::time::timeout(timeout, evaluator.evaluate(&symbol)).await {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            warn!("{}: evaluation timed out", symbol.code);
                            Outcome::Failed(EvalFailure::new(&symbol, FetchError::Timeout(timeout.as_secs())))
                        }
                    },
                    Err(e) => Outcome::Failed(EvalFailure::new(&symbol, e)),
                };
                (index, outcome)
            });
        }

        let mut matches: Vec<(usize, MatchRecord)> = Vec::new();
        let mut rejections: BTreeMap<String, usize> = BTreeMap::new();
        let mut failures: Vec<EvalFailure> = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, Outcome::Matched(record))) => {
                    state.matched += 1;
                    matches.push((index, record));
                }
                Ok((_, Outcome::NoMatch(rejection))) => {
                    *rejections.entry(rejection.kind().to_string()).or_default() += 1;
                }
                Ok((_, Outcome::Failed(failure))) => {
                    state.failed += 1;
                    failures.push(failure);
                }
                Err(e) => {
                    warn!("Scan task failed: {}", e);
                    state.failed += 1;
                    failures.push(EvalFailure {
                        code: "unknown".to_string(),
                        error: format!("task failed: {}", e),
                    });
                }
            }

            state.completed += 1;
            progress.send_replace(state);
            if state.completed % LOG_EVERY == 0 {
                info!("Scanned {}/{} symbols...", state.completed, total);
            }
        }

        // stable output: volume multiple descending, then universe order
        matches.sort_by(|(ia, a), (ib, b)| {
            b.volume_multiple
                .total_cmp(&a.volume_multiple)
                .then_with(|| ia.cmp(ib))
        });
        failures.sort_by(|a, b| a.code.cmp(&b.code));

        let report = ScanReport::new(
            self.config.preset,
            started_at,
            total,
            matches.into_iter().map(|(_, record)| record).collect(),
            rejections,
            failures,
        );
        info!("Scan complete. {}", report.summary());
        report
    }
}
