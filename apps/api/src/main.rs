mod analytics;
mod config;
mod dashboard;
mod dataset;
mod errors;
mod ingest;
mod market;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dataset::{Dataset, DatasetStore};
use crate::market::{DemandSource, HttpDemandClient, NoDemandSource};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Insights API v{}", env!("CARGO_PKG_VERSION"));

    // Load the sample dataset, if one is configured
    let dataset = match &config.sample_dataset_path {
        Some(path) => Dataset::from_csv_file(path).unwrap_or_else(|e| {
            warn!(
                "Could not load sample dataset {}: {e}; starting empty",
                path.display()
            );
            Dataset::empty()
        }),
        None => {
            info!("SAMPLE_DATASET_PATH not set; starting with an empty dataset");
            Dataset::empty()
        }
    };

    // Initialize market demand source
    let demand: Arc<dyn DemandSource> = match &config.market_api_url {
        Some(url) => {
            info!("Market demand client initialized ({url})");
            Arc::new(HttpDemandClient::new(url)?)
        }
        None => Arc::new(NoDemandSource),
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        dataset: DatasetStore::new(dataset),
        demand,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
