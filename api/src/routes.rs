use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::Config;
use squeeze_core::config::{Containment, Preset};
use squeeze_core::data::{Lookback, UniverseEnumerator};
use squeeze_core::scan::{ScanDriver, ScanProgress, ScanReport};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::ApiState;

/// Optional overrides for one scan; omitted fields keep the server configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScanRequest {
    pub preset: Option<Preset>,
    pub lookback: Option<Lookback>,
    pub workers: Option<usize>,
    pub containment: Option<Containment>,
    pub breakout_margin: Option<f64>,
    pub volume_multiplier: Option<f64>,
    pub liquidity_floor: Option<f64>,
    pub symbol_timeout_secs: Option<u64>,
    pub symbols: Vec<String>,
}

impl ScanRequest {
    fn apply(&self, config: &mut Config) {
        if let Some(preset) = self.preset {
            config.preset = preset;
        }
        config.lookback = self.lookback.or(config.lookback);
        config.workers = self.workers.or(config.workers);
        config.containment = self.containment.or(config.containment);
        config.breakout_margin = self.breakout_margin.or(config.breakout_margin);
        config.volume_multiplier = self.volume_multiplier.or(config.volume_multiplier);
        config.liquidity_floor = self.liquidity_floor.or(config.liquidity_floor);
        config.symbol_timeout_secs = self.symbol_timeout_secs.or(config.symbol_timeout_secs);
    }
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/scan", post(start_scan))
        .route("/api/scan/progress", get(scan_progress))
        .route("/api/scan/report", get(scan_report))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn start_scan(
    State(state): State<ApiState>,
    body: Option<Json<ScanRequest>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let mut config = state.config.clone();
    request.apply(&mut config);
    let scan_config = config.scan_config().map_err(ApiError::invalid)?;
    let preset = scan_config.preset;

    let Some(slot) = state.try_begin() else {
        return Err(ApiError::ScanInProgress);
    };

    let prepared = UniverseEnumerator::enumerate(state.master.as_ref())
        .map(|universe| UniverseEnumerator::restrict(universe, &request.symbols))
        .and_then(|universe| Ok((universe, ScanDriver::new(state.provider.clone(), scan_config)?)));
    let (universe, driver) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            drop(slot);
            warn!("Failed to start scan: {:#}", e);
            return Err(ApiError::internal(e));
        }
    };

    let total = universe.len();
    let (progress_tx, progress_rx) = ScanProgress::channel(total);
    state.watch_progress(progress_rx).await;

    let task_state = state.clone();
    tokio::spawn(async move {
        let report = driver.run(universe, &progress_tx).await;
        task_state.store_report(report).await;
        drop(slot);
    });

    info!("Scan started: preset={}, symbols={}", preset, total);
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "started", "preset": preset, "total": total })),
    ))
}

async fn scan_progress(State(state): State<ApiState>) -> Json<Value> {
    let progress = state.progress().await;
    Json(json!({
        "running": state.is_running(),
        "fraction": progress.map(|p| p.fraction()),
        "progress": progress,
    }))
}

async fn scan_report(State(state): State<ApiState>) -> Result<Json<ScanReport>, ApiError> {
    state.report().await.map(Json).ok_or(ApiError::NoReport)
}
