//! `POST /api/action`: actions travel over the WebSocket.

use axum::Json;
use serde::Serialize;

/// Body of `POST /api/action`.
#[derive(Debug, Serialize)]
pub struct ActionHint {
    pub message: &'static str,
}

/// `POST /api/action`: actions stream their output, so they only run over
/// the WebSocket.
pub async fn post_action() -> Json<ActionHint> {
    Json(ActionHint {
        message: "Use WebSocket for real-time actions",
    })
}
