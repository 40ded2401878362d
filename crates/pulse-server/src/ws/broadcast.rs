//! Event fan-out to registered WebSocket connections.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use pulse_core::events::BroadcastEvent;

use super::registry::ConnectionRegistry;
use crate::metrics::WS_BROADCAST_DROPS_TOTAL;

/// Delivers a [`BroadcastEvent`] to every registered connection.
///
/// Delivery is best-effort and at-most-once: the membership is sampled
/// when `broadcast` is called, connections joining afterwards do not get
/// the message, and a failed recipient neither aborts the fan-out nor gets
/// removed — deregistration belongs to that connection's lifecycle loop.
pub struct EventBroadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl EventBroadcaster {
    /// Create a broadcaster over `registry`.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Serialize `event` once and fan it out to the current membership.
    ///
    /// Never returns an error: zero recipients is a successful no-op and
    /// per-recipient failures are logged and counted only.
    pub async fn broadcast(&self, event: &BroadcastEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(json) => Arc::new(json),
            Err(e) => {
                // Unreachable for the event types we define, but a broadcast
                // must never panic the request that triggered it.
                warn!(error = %e, "failed to serialize broadcast event");
                return;
            }
        };

        let recipients = self.registry.snapshot().await;
        let mut delivered = 0_usize;
        for connection in &recipients {
            if connection.send(Arc::clone(&payload)) {
                delivered += 1;
            } else {
                counter!(WS_BROADCAST_DROPS_TOTAL).increment(1);
                warn!(
                    conn_id = %connection.id,
                    total_drops = connection.drop_count(),
                    "broadcast delivery failed for recipient"
                );
            }
        }
        debug!(
            recipients = recipients.len(),
            delivered, "broadcast fan-out complete"
        );
    }
}
