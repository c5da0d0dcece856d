//! Dashboard push channel over WebSocket.
//!
//! # Data Flow
//! ```text
//! Store change → DashboardRelay → broadcast<PushEvent> ─┐
//!                                                       ├→ client_session → Client
//! Connect → initial dashboard snapshot ─────────────────┘
//! ```
//!
//! # Design Decisions
//! - Server to client only; inbound text frames are ignored
//! - A client that falls behind the broadcast gets a fresh snapshot
//! - Sessions end on server shutdown so draining does not hang

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;

use crate::dashboard::PushEvent;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `GET /ws`
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| client_session(socket, state))
}

async fn client_session(mut socket: WebSocket, state: AppState) {
    let mut updates = state.push.subscribe();
    let mut shutdown = state.shutdown.subscribe();

    metrics::ws_client_connected();
    tracing::debug!("Dashboard client connected");

    if send_snapshot(&mut socket, &state).await.is_ok() {
        loop {
            tokio::select! {
                update = updates.recv() => {
                    let sent = match outgoing(update) {
                        Outgoing::Event(event) => send_event(&mut socket, &event).await,
                        Outgoing::Snapshot => send_snapshot(&mut socket, &state).await,
                        Outgoing::Stop => break,
                    };
                    if sent.is_err() {
                        break;
                    }
                }
                inbound = socket.recv() => match inbound {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                },
                _ = shutdown.recv() => {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    }

    metrics::ws_client_disconnected();
    tracing::debug!("Dashboard client disconnected");
}

/// What a client session sends for one broadcast receive.
#[derive(Debug)]
enum Outgoing {
    Event(PushEvent),
    /// Updates were missed; a fresh snapshot replaces them.
    Snapshot,
    Stop,
}

fn outgoing(update: Result<PushEvent, RecvError>) -> Outgoing {
    match update {
        Ok(event) => Outgoing::Event(event),
        Err(RecvError::Lagged(skipped)) => {
            tracing::debug!(skipped, "Dashboard client lagged, resending snapshot");
            Outgoing::Snapshot
        }
        Err(RecvError::Closed) => Outgoing::Stop,
    }
}

async fn send_snapshot(socket: &mut WebSocket, state: &AppState) -> Result<(), axum::Error> {
    match state.dashboard.snapshot(None).await {
        Ok(snapshot) => send_event(socket, &PushEvent::DashboardUpdate(snapshot)).await,
        Err(e) => {
            tracing::warn!(error = %e, "Could not build dashboard snapshot for client");
            Ok(())
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &PushEvent) -> Result<(), axum::Error> {
    match event.to_json() {
        Ok(text) => socket.send(Message::Text(text.into())).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode push event");
            Ok(())
        }
    }
}
