use axum::{extract::State, response::Json};

use super::{AppState, StatusResponse};

/// Read-only health readout, no side effects.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.health.snapshot().await;
    tracing::debug!("Status requested: {} errors so far", snapshot.errors);
    Json(StatusResponse::from(snapshot))
}
