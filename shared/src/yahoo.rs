//! Daily history from the Yahoo Finance v8 chart endpoint

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::TimeZone;
use chrono_tz::Asia::Taipei;
use reqwest::StatusCode;
use serde::Deserialize;
use squeeze_core::data::{BarProvider, DailyBar, FetchError, Lookback, SymbolRecord};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; squeeze-scanner/0.1)";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl YahooChartClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.yahoo_base_url, Duration::from_secs(config.http_timeout_secs))
    }

    fn chart_url(&self, symbol: &SymbolRecord) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol.provider_symbol())
    }

    fn transport_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout_secs)
        } else {
            FetchError::Network(e.to_string())
        }
    }

    /// Convert a decoded chart payload into chronological bars, dropping rows with gaps
    fn into_bars(envelope: ChartEnvelope, provider_symbol: &str) -> Result<Vec<DailyBar>, FetchError> {
        if let Some(err) = envelope.chart.error {
            return Err(FetchError::NotFound(format!(
                "{}: {} {}",
                provider_symbol,
                err.code,
                err.description.unwrap_or_default()
            )));
        }

        let result = envelope
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
            .ok_or_else(|| FetchError::NotFound(provider_symbol.to_string()))?;

        let timestamps = result.timestamp.unwrap_or_default();
        if timestamps.is_empty() {
            return Err(FetchError::NotFound(format!("{}: no rows", provider_symbol)));
        }

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        if quote.close.len() != timestamps.len() || quote.volume.len() != timestamps.len() {
            return Err(FetchError::Malformed(format!(
                "{}: {} timestamps, {} closes, {} volumes",
                provider_symbol,
                timestamps.len(),
                quote.close.len(),
                quote.volume.len()
            )));
        }

        let bars = timestamps
            .iter()
            .zip(quote.close)
            .zip(quote.volume)
            .filter_map(|((&ts, close), volume)| {
                let date = Taipei.timestamp_opt(ts, 0).single()?.date_naive();
                let volume = volume.filter(|v| v.is_finite() && *v >= 0.0).map(|v| v.round() as u64);
                DailyBar::from_row(date, close, volume)
            })
            .collect();
        Ok(bars)
    }
}

#[async_trait]
impl BarProvider for YahooChartClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn daily_bars(&self, symbol: &SymbolRecord, lookback: Lookback) -> Result<Vec<DailyBar>, FetchError> {
        let provider_symbol = symbol.provider_symbol();
        let response = self
            .client
            .get(self.chart_url(symbol))
            .query(&[("range", lookback.as_range()), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(provider_symbol));
        }
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {} for {}", status, provider_symbol)));
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let envelope: ChartEnvelope =
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(format!("{}: {}", provider_symbol, e)))?;

        let bars = Self::into_bars(envelope, &provider_symbol)?;
        debug!("{}: {} bars over {}", provider_symbol, bars.len(), lookback);
        Ok(bars)
    }
}
