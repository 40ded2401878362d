//! WebSocket connection management and event broadcasting.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `registry` | Thread-safe set of live connections: add/remove/snapshot |
//! | `connection` | WebSocket upgrade and the per-connection lifecycle loop |
//! | `broadcast` | Fan-out: serialize once, best-effort delivery to every member |
//!
//! ## Responsibility split
//!
//! The broadcaster only sends; it never removes a failed recipient. Each
//! connection's lifecycle loop owns liveness and is the only place that
//! deregisters it — on remote close, read error, write error, or shutdown.

pub mod broadcast;
pub mod connection;
pub mod registry;

pub use broadcast::EventBroadcaster;
pub use connection::{ClientConnection, ws_handler};
pub use registry::ConnectionRegistry;
