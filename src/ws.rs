//! WebSocket entry point: one upgrade handler, one loop per connection.
//!
//! The connection's role is decided once, from the upgrade request, and
//! holds for its whole lifetime. Every connection gets a sync snapshot on
//! join and the shared broadcast stream afterwards; inbound messages are
//! dispatched to the session, and every kind of rejection is silent.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::protocol::ClientMessage;
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Admin secret; presence and correctness make this a controller
    /// connection.
    pub token: Option<String>,
    /// Client-supplied, connection-independent participant identity.
    pub client_id: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!(client_id = ?params.client_id, "WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, params: WsQuery, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let role = state.admin.classify(params.token.as_deref());
    tracing::info!(?role, "WebSocket connected");

    // Subscribe before reading the snapshot so no broadcast between the
    // two can be missed.
    let mut broadcast_rx = state.subscribe();

    let snapshot = state.join_snapshot(params.client_id.as_deref()).await;
    if let Ok(json) = serde_json::to_string(&snapshot) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            tracing::debug!("failed to send sync snapshot");
            return;
        }
    }

    loop {
        tokio::select! {
            broadcast_msg = broadcast_rx.recv() => {
                match broadcast_msg {
                    Ok(msg) => {
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "connection lagged behind broadcast stream");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(msg) => handle_message(msg, &role, &state).await,
                            // Malformed input never crashes the session and
                            // never gets a reply.
                            Err(e) => tracing::debug!("dropping unparseable message: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    tracing::info!(?role, "WebSocket connection closed");
}

/// Drop controller-only messages from participant connections, silently.
macro_rules! require_controller {
    ($role:expr, $action:expr) => {
        if *$role != Role::Controller {
            tracing::debug!("participant attempted to {}, dropping", $action);
            return;
        }
    };
}

/// Dispatch one inbound message. Rejections of every kind - bad payloads,
/// closed voting, repeated transitions, missing capability - are silent:
/// no state change, no broadcast, no reply.
pub async fn handle_message(msg: ClientMessage, role: &Role, state: &Arc<AppState>) {
    match msg {
        ClientMessage::Vote {
            participant_id,
            choice,
        } => {
            state.apply_vote(&participant_id, choice).await;
        }

        ClientMessage::Reveal => {
            require_controller!(role, "reveal");
            state.apply_reveal().await;
        }

        ClientMessage::AdvanceRound => {
            require_controller!(role, "advance the round");
            state.apply_advance_round().await;
        }

        ClientMessage::Reset => {
            require_controller!(role, "reset the session");
            state.apply_reset().await;
        }
    }
}
