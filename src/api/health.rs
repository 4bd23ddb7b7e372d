//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Configured mail backend (`http` or `noop`)
    pub mail_backend: String,
    pub redis_trigger: RedisTriggerHealth,
}

#[derive(Debug, Serialize)]
pub struct RedisTriggerHealth {
    pub enabled: bool,
    pub channels: Vec<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let redis = &state.settings.redis;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        mail_backend: state.settings.mail.backend.as_str().to_string(),
        redis_trigger: RedisTriggerHealth {
            enabled: !redis.channels.is_empty(),
            channels: redis.channels.clone(),
        },
    })
}
