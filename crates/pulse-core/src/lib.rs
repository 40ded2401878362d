//! # pulse-core
//!
//! Foundation types for the Pulse event-logging backend.
//!
//! This crate provides the shared vocabulary the other pulse crates depend on:
//!
//! - **Branded IDs**: [`ids::EventId`], [`ids::UserId`], [`ids::ConnectionId`] as newtypes
//! - **Domain events**: [`events::NewEvent`] (validated creation input),
//!   [`events::EventRecord`] (immutable persisted record),
//!   [`events::BroadcastEvent`] (transient WebSocket fan-out message),
//!   [`events::NotificationRecord`] (derived summary-job row)
//! - **Errors**: [`events::ValidationError`] via `thiserror`
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other pulse crates.

#![deny(unsafe_code)]

pub mod events;
pub mod ids;
