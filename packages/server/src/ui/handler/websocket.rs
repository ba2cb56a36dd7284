//! WebSocket live feed handler.
//!
//! The feed is push-only: every accepted post is forwarded to each connected
//! socket. Anything the viewer sends is ignored except Close.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::ui::state::AppState;

pub async fn live_feed_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives live updates from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this subscriber to receive live updates
    let (tx, rx) = mpsc::unbounded_channel();
    let subscriber_id = state.subscribe_live_feed_usecase.connect(tx).await;
    tracing::info!("Live subscriber '{}' connected", subscriber_id.as_str());

    let subscriber_label = subscriber_id.as_str().to_string();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!("Live subscriber '{}' requested close", subscriber_label);
                    break;
                }
                Ok(Message::Ping(_)) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Ok(_) => {
                    tracing::debug!("Ignoring inbound frame from '{}'", subscriber_label);
                }
                Err(e) => {
                    tracing::warn!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .subscribe_live_feed_usecase
        .disconnect(&subscriber_id)
        .await;
    tracing::info!("Live subscriber '{}' disconnected", subscriber_id.as_str());
}
