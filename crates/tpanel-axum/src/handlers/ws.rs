//! Observer WebSocket.
//!
//! `GET /ws` upgrades to a text WebSocket carrying JSON messages.
//!
//! ## Protocol
//!
//! | Direction | Content |
//! |---|---|
//! | Server → Client | `{"event": "<name>", "data": <payload>}` for every [`PanelEvent`] |
//! | Client → Server | `{"event": "action", "data": {"type": "<action>", "params": {...}}}` |
//!
//! ## Lifecycle
//!
//! 1. The observer is registered with the hub and sent the latest snapshot
//!    of every probe.
//! 2. An egress task drains the observer's channel into the socket.
//! 3. The ingest loop parses actions and dispatches each on its own task,
//!    so a long module run does not stall further messages.
//! 4. When either side finishes, the observer is deregistered.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use tpanel_core::{ActionRequest, EventBroadcaster, EventTarget, ObserverId, PanelEvent};

use crate::state::AppState;

/// Messages accepted from observers.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundMessage {
    Action(ActionRequest),
}

/// Parse one text frame.
pub fn parse_inbound(text: &str) -> Result<InboundMessage, serde_json::Error> {
    serde_json::from_str(text)
}

/// `GET /ws`: WebSocket upgrade endpoint for observers.
pub async fn observer_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_observer(socket, state))
}

/// Queue the latest snapshots for a freshly registered observer.
fn send_resync(state: &AppState, observer: ObserverId) {
    for snapshot in state.store.latest() {
        state
            .hub
            .emit(snapshot.into_event(), EventTarget::Observer(observer));
    }
}

fn dispatch(state: &AppState, observer: ObserverId, request: ActionRequest) {
    let state = AppState::clone(state);
    tokio::spawn(async move {
        state.dispatcher.dispatch(observer, request).await;
    });
}

async fn handle_observer(socket: WebSocket, state: AppState) {
    let (observer, mut events) = state.hub.register();
    info!(%observer, "Observer connected");
    send_resync(&state, observer);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    let mut egress = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match encode_event(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(event = event.event_name(), error = %e, "Failed to serialize event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut ingest = tokio::spawn({
        let state = AppState::clone(&state);
        async move {
            while let Some(msg) = ws_receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => match parse_inbound(&text) {
                        Ok(InboundMessage::Action(request)) => {
                            debug!(%observer, kind = %request.kind, "Action received");
                            dispatch(&state, observer, request);
                        }
                        Err(e) => {
                            warn!(%observer, error = %e, "Ignoring malformed message");
                        }
                    },
                    Ok(Message::Close(_)) | Err(_) => break,
                    // Binary frames are not part of the protocol; ping/pong is
                    // handled by axum.
                    Ok(_) => {}
                }
            }
        }
    });

    tokio::select! {
        _ = &mut ingest => { egress.abort(); }
        _ = &mut egress => { ingest.abort(); }
    }

    state.hub.deregister(observer);
    info!(%observer, "Observer disconnected");
}

/// Wire form of an outbound event, as written to the socket.
pub fn encode_event(event: &PanelEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}
