use axum::{Router, routing::get, Json, response::Json as ResponseJson};
use crate::models::{AppState, StatusResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

async fn root() -> ResponseJson<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        service: Some("socratic-seminar-backend".to_string()),
    })
}

/// Health check for monitoring
async fn health_check() -> ResponseJson<StatusResponse> {
    Json(StatusResponse {
        status: "healthy".to_string(),
        service: None,
    })
}
