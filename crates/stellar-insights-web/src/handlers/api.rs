//! JSON and WebSocket handlers

use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use stellar_insights_core::{StateUpdate, ViewState};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Duration, Instant, interval_at};
use tracing::{debug, error, info, warn};

const PING_PERIOD: Duration = Duration::from_secs(30);

/// Current view state as JSON
pub async fn view_state(State(state): State<Arc<AppState>>) -> Json<ViewState> {
    Json(state.controller.state())
}

/// WebSocket handler streaming view state changes
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| websocket_connection(socket, state))
}

/// Send the current state, then every transition until the client goes
/// away. Frames carry strictly increasing revisions.
async fn websocket_connection(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before reading the current state so nothing falls in between
    let mut updates = state.controller.subscribe_updates();
    let current = state.controller.current_update();
    let mut sent = current.revision;

    info!(revision = sent, "WebSocket connection established");

    if send_update(&mut sender, &current).await.is_err() {
        return;
    }

    let mut ping_interval = interval_at(Instant::now() + PING_PERIOD, PING_PERIOD);

    loop {
        tokio::select! {
            received = updates.recv() => {
                let next = match received {
                    Ok(update) => update,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client fell behind, resending current state");
                        state.controller.current_update()
                    }
                    Err(RecvError::Closed) => break,
                };
                if next.revision <= sent {
                    continue;
                }
                sent = next.revision;
                debug!(revision = sent, state = next.state.name(), "Pushing view state");
                if send_update(&mut sender, &next).await.is_err() {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                if sender.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    Some(Ok(_)) => continue,
                }
            }
        }
    }

    info!("WebSocket connection closed");
}

async fn send_update(
    sender: &mut SplitSink<WebSocket, Message>,
    update: &StateUpdate,
) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(update).map_err(axum::Error::new)?;
    sender.send(Message::Text(payload)).await
}

/// Metrics in the Prometheus text format, when an exporter is installed
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
