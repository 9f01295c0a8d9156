use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// What the running service is wired to
#[derive(Debug, Clone)]
pub struct Readiness {
    pub tts_provider: &'static str,
    pub archive_configured: bool,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(readiness): State<Arc<Readiness>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "tts": readiness.tts_provider,
            "archive": if readiness.archive_configured { "configured" } else { "disabled" }
        })),
    )
}
