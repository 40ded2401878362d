//! WebSocket upgrade and the per-connection lifecycle loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use tokio::sync::mpsc;
use tracing::{debug, info};

use pulse_core::ids::ConnectionId;

use crate::metrics::{WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL};
use crate::state::AppState;

/// Registry-side handle to one live connection.
///
/// The lifecycle loop owns the socket; the registry holds only this handle,
/// used by the broadcaster to enqueue outbound payloads. The queue is
/// drained by the connection's own loop, which preserves per-recipient
/// delivery order.
pub struct ClientConnection {
    /// Connection identifier.
    pub id: ConnectionId,
    tx: mpsc::Sender<Arc<String>>,
    drops: AtomicU64,
}

impl ClientConnection {
    /// Create a handle around the connection's outbound queue.
    pub fn new(id: ConnectionId, tx: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            id,
            tx,
            drops: AtomicU64::new(0),
        }
    }

    /// Enqueue a payload without blocking.
    ///
    /// Returns `false` when the queue is full or the connection is gone —
    /// the message is simply not delivered to this recipient.
    pub fn send(&self, payload: Arc<String>) -> bool {
        match self.tx.try_send(payload) {
            Ok(()) => true,
            Err(_) => {
                let _ = self.drops.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Lifetime count of payloads this connection failed to accept.
    pub fn drop_count(&self) -> u64 {
        self.drops.load(Ordering::Relaxed)
    }
}

/// Axum handler — upgrades HTTP to WebSocket at `GET /ws`.
///
/// The live channel is deliberately unauthenticated; it carries outbound
/// fan-out only.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_connection(socket, state))
}

/// Per-connection lifecycle loop — lives for the entire session.
///
/// Registers the connection once the upgrade has completed, then waits on
/// three things at once: the outbound queue (broadcast delivery), the
/// inbound stream (liveness only — payloads are discarded), and the
/// process shutdown token. Whichever fires the exit, control falls through
/// to the single deregistration point below the loop.
async fn run_connection(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = ConnectionId::generate();
    let (queue_tx, mut queue_rx) =
        mpsc::channel(state.settings.server.connection_queue_depth);
    let connection = Arc::new(ClientConnection::new(conn_id.clone(), queue_tx));

    state.registry.add(Arc::clone(&connection)).await;
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);
    info!(conn_id = %conn_id, "websocket connected");

    let (mut sink, mut stream) = socket.split();
    let shutdown = state.shutdown.clone();

    loop {
        tokio::select! {
            queued = queue_rx.recv() => {
                // None: our registry entry was replaced and the sender dropped.
                let Some(payload) = queued else { break };
                if let Err(e) = sink.send(Message::Text(payload.as_str().into())).await {
                    debug!(conn_id = %conn_id, error = %e, "write failed");
                    break;
                }
            }

            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(conn_id = %conn_id, "remote closed");
                        break;
                    }
                    // Inbound content has no protocol meaning on this channel.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(conn_id = %conn_id, error = %e, "read failed");
                        break;
                    }
                }
            }

            () = shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    }

    // Single deregistration point — every exit path funnels through here,
    // and remove() tolerates already-gone entries.
    state.registry.remove(&conn_id).await;
    gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    info!(
        conn_id = %conn_id,
        undelivered = connection.drop_count(),
        "websocket disconnected"
    );
}
