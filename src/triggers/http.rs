use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::Completion;
use crate::server::AppState;

/// Body returned by `POST /invoke`
#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    /// `succeeded` or `failed`
    pub status: &'static str,
    /// Completion message
    pub message: String,
    pub invocation_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

impl InvokeResponse {
    fn new(invocation_id: Uuid, completion: Completion) -> Self {
        let status = if completion.is_success() {
            "succeeded"
        } else {
            "failed"
        };

        let message = match completion {
            Completion::Succeeded(message) | Completion::Failed(message) => message,
        };

        Self {
            status,
            message,
            invocation_id,
            completed_at: Utc::now(),
        }
    }
}

/// Run one stream envelope through the pipeline.
/// A failed completion is answered with 500 so the caller can tell it apart.
pub async fn invoke(
    State(state): State<AppState>,
    Json(envelope): Json<serde_json::Value>,
) -> (StatusCode, Json<InvokeResponse>) {
    let invocation_id = Uuid::new_v4();
    let completion = state.pipeline.invoke(invocation_id, &envelope).await;

    let status = if completion.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(InvokeResponse::new(invocation_id, completion)))
}
