pub mod api;
pub mod dashboard;
pub mod voice;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(dashboard::index))
        // API (JSON for charts)
        .route("/api/summary", get(api::summary))
        .route("/api/general", get(api::general))
        .route("/api/drilldown/months", get(api::months))
        .route("/api/drilldown/weeks", get(api::weeks))
        .route("/api/breakdown", get(api::breakdown))
        .route("/api/analytics", get(api::analytics))
        .route("/api/categories", get(api::category_breakdown))
        // Voice assistant
        .route("/api/voice/start", post(voice::start))
        .route("/api/voice/stop", post(voice::stop))
        .route("/api/voice/status", get(voice::status))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
