use std::sync::Arc;

use crate::config::Config;
use crate::dataset::DatasetStore;
use crate::market::DemandSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub dataset: DatasetStore,
    /// Remote job-demand lookup. `NoDemandSource` when MARKET_API_URL is unset.
    pub demand: Arc<dyn DemandSource>,
}
