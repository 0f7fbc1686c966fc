//! `WebSocket` handler streaming state summaries.
//!
//! Clients connect to `GET /ws/state`, immediately receive the current
//! [`StateSummary`](crate::state::StateSummary), then one more after every
//! applied transition. The handler follows the store's watch channel, so a
//! slow client skips straight to the newest state instead of queueing.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::state::{AppState, StateSummary};

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming state summaries.
///
/// # Route
///
/// `GET /ws/state`
pub async fn ws_state(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn send_summary(socket: &mut WebSocket, summary: &StateSummary) -> bool {
    let json = match serde_json::to_string(summary) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize state summary: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.store.watch();
    let initial = StateSummary::of(&rx.borrow_and_update());
    if !send_summary(&mut socket, &initial).await {
        debug!("WebSocket client disconnected (send failed)");
        return;
    }

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    debug!("Store dropped, shutting down WebSocket");
                    return;
                }
                let summary = StateSummary::of(&rx.borrow_and_update());
                if !send_summary(&mut socket, &summary).await {
                    debug!("WebSocket client disconnected (send failed)");
                    return;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}
