//! Route definitions for the web interface

use crate::{
    handlers::{api, pages},
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Build the complete web application router
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Page routes
        .route("/", get(pages::dashboard))
        .route("/retry", post(pages::retry))
        // JSON view of the controller
        .route("/api/view-state", get(api::view_state))
        // WebSocket for state changes
        .route("/ws", get(api::websocket_handler))
        // Prometheus metrics
        .route("/metrics", get(api::metrics))
        // Health check
        .route("/health", get(api::health_check))
}
