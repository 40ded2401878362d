//! # pulse-server
//!
//! Axum HTTP + WebSocket server for the Pulse backend.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `auth` | Bearer extraction and identity verification against the provider |
//! | `http` | REST handlers: events, analytics, health |
//! | `ws` | Connection registry, per-connection lifecycle loop, broadcast fan-out |
//! | `notifier` | Periodic notification job over recently created events |
//! | `state` | Shared `AppState` passed to all handlers |
//! | `router` | Route table and middleware assembly |
//! | `error` | `ApiError` → HTTP status mapping |
//! | `metrics` | Prometheus recorder and metric name constants |
//!
//! ## Data Flow
//!
//! `POST /events/` → verify bearer → validate → persist (store transaction)
//! → broadcast to every registered connection. Independently, one lifecycle
//! loop runs per `GET /ws` upgrade, registering on entry and deregistering
//! on every exit path.

#![deny(unsafe_code)]

pub mod auth;
pub mod error;
pub mod http;
pub mod metrics;
pub mod notifier;
pub mod router;
pub mod state;
pub mod ws;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
