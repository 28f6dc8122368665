use axum::{
    Router,
    routing::post,
    Json,
    extract::State,
};
use crate::models::{AppState, SeminarState};
use crate::types::AppResult;
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/seminar/runs", post(create_run))
}

/// POST /api/seminar/runs - Run the seminar graph once and return the final state
pub async fn create_run(
    State(state): State<AppState>,
    Json(run): Json<SeminarState>,
) -> AppResult<Json<SeminarState>> {
    info!(
        messages = run.messages.len(),
        has_payment = run.payment.is_some(),
        has_artifact = run.artifact.is_some(),
        "Received seminar run"
    );

    let result = state.graph.invoke(run).await?;
    Ok(Json(result))
}
