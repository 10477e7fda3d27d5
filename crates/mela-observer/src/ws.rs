//! `WebSocket` handler for real-time crowd update streaming.
//!
//! Clients connect to `GET /ws/crowd-updates` and receive a JSON
//! envelope each simulation tick. Connecting registers the client with
//! the broadcast hub, which starts the simulation loop for the first
//! observer; disconnecting deregisters it, stopping the loop when the
//! last observer leaves.
//!
//! The client may send `{"type": "ping"}` as a text frame and will get
//! a timestamped `{"type": "pong"}` back on its own socket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::debug;

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming crowd updates.
///
/// # Route
///
/// `GET /ws/crowd-updates`
pub async fn ws_crowd_updates(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: register with the hub, forward
/// queued envelopes, and answer pings until the client goes away.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let (observer_id, mut rx) = state.hub.connect();
    debug!(observer = %observer_id, "WebSocket client connected");

    loop {
        tokio::select! {
            // Forward the next queued crowd update envelope.
            queued = rx.recv() => {
                match queued {
                    Some(json) => {
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!(observer = %observer_id, "WebSocket client disconnected (send failed)");
                            break;
                        }
                    }
                    // The hub dropped this observer (queue overflow).
                    None => break,
                }
            }
            // Handle inbound frames from the client.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(observer = %observer_id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(observer = %observer_id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        // Application-level ping; the pong goes through
                        // the hub queue so it cannot overtake a broadcast.
                        if is_ping(&text) {
                            state.hub.send_direct(observer_id, pong_reply());
                        }
                    }
                    Some(Err(e)) => {
                        debug!(observer = %observer_id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Ignore binary and pong frames from the client.
                    }
                }
            }
        }
    }

    state.hub.disconnect(observer_id);
}

/// Whether a text frame is an application-level ping.
fn is_ping(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str().map(String::from)))
        .is_some_and(|t| t == "ping")
}

/// Build the application-level pong reply.
fn pong_reply() -> String {
    serde_json::json!({
        "type": "pong",
        "timestamp": chrono::Utc::now(),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_frames_are_recognized() {
        assert!(is_ping(r#"{"type": "ping"}"#));
        assert!(!is_ping(r#"{"type": "subscribe"}"#));
        assert!(!is_ping("not json"));
        assert!(!is_ping(r#"{"kind": "ping"}"#));
    }

    #[test]
    fn pong_reply_is_timestamped() {
        let reply = pong_reply();
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap_or_default();
        assert_eq!(
            value.get("type").and_then(serde_json::Value::as_str),
            Some("pong")
        );
        assert!(value.get("timestamp").is_some());
    }
}
