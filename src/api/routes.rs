use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;
use crate::triggers::invoke;

use super::health::health;
use super::metrics::prometheus_metrics;

/// Unauthenticated operational endpoints
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
}

/// Event entry point; the server layers the API key check on top.
pub fn invoke_routes() -> Router<AppState> {
    Router::new().route("/invoke", post(invoke))
}
