//! HTTP surface: trigger a run, poll readiness, serve the latest chart.

use axum::{Json, extract::State, http::StatusCode, response::Html};

use crate::AppState;
use crate::models::pipeline::{ErrorResponse, RunAcceptedResponse, StatusResponse};
use crate::services::run_controller::TriggerOutcome;

/// GET /
pub async fn root() -> &'static str {
    "CoinPulse ETL server is running. Hit /run to launch the pipeline."
}

/// GET /run
///
/// Dispatches a pipeline run in the background and returns immediately.
/// Rejected with 409 while a previous run is still in flight.
pub async fn trigger_run(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RunAcceptedResponse>), (StatusCode, Json<ErrorResponse>)> {
    match state.controller.trigger() {
        TriggerOutcome::Accepted { run_id } => Ok((
            StatusCode::ACCEPTED,
            Json(RunAcceptedResponse {
                status: "accepted".to_string(),
                run_id: run_id.to_string(),
            }),
        )),
        TriggerOutcome::AlreadyRunning => Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A pipeline run is already in flight".to_string(),
            }),
        )),
    }
}

/// GET /status
///
/// Readiness probe for client-side polling: true once a run has published
/// the chart artifact.
pub async fn run_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        ready: state.controller.check_ready().await,
    })
}

/// GET /chart
///
/// Serves the most recently published chart artifact.
pub async fn latest_chart(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Json<ErrorResponse>)> {
    match tokio::fs::read_to_string(state.controller.published_path()).await {
        Ok(html) => Ok(Html(html)),
        Err(_) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No chart has been published yet".to_string(),
            }),
        )),
    }
}
