//! Per-symbol evaluation: fetch history, then apply the rule set

use crate::config::ScanConfig;
use crate::data::{BarProvider, BarSeries, Lookback, SymbolRecord};
use crate::strategy::{EvalFailure, MatchRecord, Outcome, Rejection, SqueezeBreakout};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Evaluates one symbol against the configured rules
pub struct SymbolEvaluator {
    provider: Arc<dyn BarProvider>,
    rule: SqueezeBreakout,
    lookback: Lookback,
}

impl SymbolEvaluator {
    /// Create new evaluator
    pub fn new(provider: Arc<dyn BarProvider>, config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            provider,
            rule: SqueezeBreakout::new(config.policy.clone())?,
            lookback: config.lookback,
        })
    }

    /// Fetch and screen one symbol.
    ///
    /// Missing data and failed predicates are `NoMatch`; transport problems are
    /// `Failed` so the caller can count them.
    pub async fn evaluate(&self, symbol: &SymbolRecord) -> Outcome {
        let bars = match self.provider.daily_bars(symbol, self.lookback).await {
            Ok(bars) => bars,
            Err(e) if e.is_unavailable() => {
                debug!("{}: no data from {}: {}", symbol.code, self.provider.name(), e);
                return Outcome::NoMatch(Rejection::Unavailable {
                    detail: e.to_string(),
                });
            }
            Err(e) => {
                warn!("{}: fetch from {} failed: {}", symbol.code, self.provider.name(), e);
                return Outcome::Failed(EvalFailure::new(symbol, e));
            }
        };

        let series = BarSeries::from_vec(bars);
        match self.rule.screen(series.bars()) {
            Ok(breakout) => {
                let record = MatchRecord::new(symbol, &breakout);
                info!(
                    "MATCH {} {} [{}]: price={:.2}, change={:.2}%, volume x{:.2}",
                    record.code, record.name, record.sector, record.price, record.percent_change,
                    record.volume_multiple
                );
                Outcome::Matched(record)
            }
            Err(rejection) => {
                debug!("{}: {}", symbol.code, rejection);
                Outcome::NoMatch(rejection)
            }
        }
    }

    /// Match-or-nothing view of [`evaluate`](Self::evaluate)
    pub async fn evaluate_match(&self, symbol: &SymbolRecord) -> Option<MatchRecord> {
        self.evaluate(symbol).await.into_match()
    }
}
