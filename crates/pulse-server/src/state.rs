//! Central shared state — passed as `Arc<AppState>` to all axum handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;

use pulse_settings::PulseSettings;
use pulse_store::EventStore;

use crate::auth::IdentityVerifier;
use crate::ws::{ConnectionRegistry, EventBroadcaster};

/// Everything the handlers share.
///
/// The registry is the single piece of shared mutable state binding the
/// ingestion path and the connection lifecycle loops together; all other
/// fields are read-only after startup.
pub struct AppState {
    /// Loaded settings snapshot.
    pub settings: PulseSettings,
    /// Persistence collaborator.
    pub store: Arc<EventStore>,
    /// Identity-verification collaborator.
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Live connection membership.
    pub registry: Arc<ConnectionRegistry>,
    /// Fan-out dispatcher over `registry`.
    pub broadcaster: EventBroadcaster,
    /// Cancelled at process shutdown; every lifecycle loop watches it.
    pub shutdown: CancellationToken,
    /// Prometheus render handle. `None` when no recorder is installed
    /// (unit and integration tests).
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Assemble the state with a fresh, empty registry.
    pub fn new(
        settings: PulseSettings,
        store: EventStore,
        verifier: Arc<dyn IdentityVerifier>,
        shutdown: CancellationToken,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = EventBroadcaster::new(Arc::clone(&registry));
        Self {
            settings,
            store: Arc::new(store),
            verifier,
            registry,
            broadcaster,
            shutdown,
            metrics,
        }
    }
}
