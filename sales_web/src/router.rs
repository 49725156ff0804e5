use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

/// Create the application router with all pages and API endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // HTML pages
        .route("/", get(handlers::index))
        .route("/forecast", get(handlers::forecast_page))
        // JSON endpoints
        .route("/api/status", get(handlers::api_status))
        .route("/api/history", get(handlers::api_history))
        .route("/api/forecast", get(handlers::api_forecast))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
