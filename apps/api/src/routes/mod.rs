pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dashboard::handlers as dashboard;
use crate::dataset::handlers as dataset;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Dataset API
        .route("/api/v1/dataset", get(dataset::handle_get_dataset))
        .route("/api/v1/dataset/csv", post(dataset::handle_upload_csv))
        .route(
            "/api/v1/dataset/upload",
            post(dataset::handle_upload_multipart),
        )
        .route("/api/v1/dataset/rows", post(dataset::handle_upload_rows))
        // Dashboard API
        .route("/api/v1/stats", get(dashboard::handle_stats))
        .route("/api/v1/charts", get(dashboard::handle_charts))
        .route("/api/v1/insights", post(dashboard::handle_insights))
        .route(
            "/api/v1/analysis/render",
            post(dashboard::handle_render_analysis),
        )
        .with_state(state)
}
