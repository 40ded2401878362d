//! # pulse-store
//!
//! SQLite persistence for the Pulse backend.
//!
//! Layout mirrors the write path: [`schema`] owns the migration,
//! [`connection`] builds the r2d2 pool, the [`repositories`] are stateless
//! and take `&Connection`, and [`store::EventStore`] composes them into
//! transactional operations — callers never observe partial state.
//!
//! The analytics counter lives in the same database and is incremented in
//! the same transaction that inserts an event, so `analytics.total_events`
//! always equals the number of stored events for that user.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod repositories;
pub mod schema;
pub mod store;

pub use errors::{Result, StoreError};
pub use store::EventStore;
