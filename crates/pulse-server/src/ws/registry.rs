//! Thread-safe registry of live WebSocket connections.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use pulse_core::ids::ConnectionId;

use super::connection::ClientConnection;

/// The set of currently-open, fully-upgraded connections.
///
/// Membership changes are atomic with respect to [`snapshot`](Self::snapshot):
/// a broadcast iterates a copy taken under the read lock and never observes
/// a half-applied mutation. Connections enter only after the upgrade
/// completes and leave exactly once, from their own lifecycle loop.
pub struct ConnectionRegistry {
    /// Live connections indexed by connection ID.
    connections: RwLock<HashMap<ConnectionId, Arc<ClientConnection>>>,
    /// Atomic counter tracking membership (avoids read-locking for count queries).
    active_count: AtomicUsize,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
        }
    }

    /// Add a connection.
    ///
    /// Adding an ID that is already present replaces the previous entry and
    /// leaves the count unchanged, so a double add can never inflate the
    /// membership count.
    pub async fn add(&self, connection: Arc<ClientConnection>) {
        let mut conns = self.connections.write().await;
        if conns.insert(connection.id.clone(), connection).is_none() {
            let _ = self.active_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Remove a connection by ID. No-op when absent, so the normal-close
    /// path and an error-path cleanup can race without harm.
    pub async fn remove(&self, connection_id: &ConnectionId) {
        let mut conns = self.connections.write().await;
        if conns.remove(connection_id).is_some() {
            let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Copy-on-read snapshot of the current membership.
    ///
    /// Mutations concurrent with the returned snapshot affect future
    /// broadcasts only — never the snapshot itself.
    pub async fn snapshot(&self) -> Vec<Arc<ClientConnection>> {
        let conns = self.connections.read().await;
        conns.values().cloned().collect()
    }

    /// Number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
