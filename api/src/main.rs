use anyhow::Result;
use shared::{Config, CsvSymbolMaster, YahooChartClient};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod state;

use state::ApiState;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_JSON").map(|v| v == "true" || v == "1").unwrap_or(false) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting squeeze scanner API server...");

    let config = Config::from_env()?;
    let provider = Arc::new(YahooChartClient::from_config(&config)?);
    let master = Arc::new(CsvSymbolMaster::from_config(&config));
    info!("Symbol master files: {:?}", master.paths());

    let bind_addr = config.api_bind_addr.clone();
    let app = routes::build_router(ApiState::new(config, provider, master))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
