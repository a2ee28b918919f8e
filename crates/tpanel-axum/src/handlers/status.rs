//! `GET /api/status`: the latest snapshot of every probe.

use axum::Json;
use axum::extract::State;

use tpanel_core::StatusReport;

use crate::state::AppState;

/// `GET /api/status`: the latest broadcast snapshots.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.store.report())
}
