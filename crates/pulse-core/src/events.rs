//! Domain event types.
//!
//! Three shapes, one per stage of an event's life:
//!
//! - **[`NewEvent`]**: validated creation input (title + optional description).
//! - **[`EventRecord`]**: the immutable persisted record. Written once by the
//!   store, which assigns the ID and the UTC timestamp; never mutated after.
//! - **[`BroadcastEvent`]**: the transient message fanned out over WebSocket
//!   when a record has been durably stored. Never persisted, never retried.
//!
//! [`NotificationRecord`] sits apart: a derived row the periodic summary
//! job generates from recent records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, UserId};

/// A rejected creation input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `title` was missing, empty, or whitespace-only.
    #[error("title must be non-empty")]
    EmptyTitle,
}

/// Creation input for one event.
///
/// `title` is required and must be non-empty; `description` is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event title (required, non-empty).
    pub title: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl NewEvent {
    /// Check creation preconditions without consuming the input.
    ///
    /// Must pass before any persistence call — a rejected input has no
    /// side effects anywhere.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// One persisted event, exactly as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Store-assigned identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Optional description. Serialized as `null` when absent, matching
    /// the wire format clients already parse.
    pub description: Option<String>,
    /// Owning user.
    pub user_id: UserId,
    /// UTC creation timestamp, RFC 3339.
    pub created_at: String,
}

/// Format a timestamp the way records store it.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Transient message delivered to every live WebSocket subscriber.
///
/// Derived from an [`EventRecord`] after a successful write; delivery is
/// best-effort, at-most-once, per recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BroadcastEvent {
    /// A new event was durably stored.
    EventCreated {
        /// Store-assigned identifier.
        id: EventId,
        /// Event title.
        title: String,
        /// Optional description (`null` when absent).
        description: Option<String>,
        /// Owning user.
        user_id: UserId,
        /// UTC creation timestamp, RFC 3339.
        created_at: String,
    },
}

impl BroadcastEvent {
    /// Build the `event_created` message for a freshly persisted record.
    #[must_use]
    pub fn event_created(record: &EventRecord) -> Self {
        Self::EventCreated {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            user_id: record.user_id.clone(),
            created_at: record.created_at.clone(),
        }
    }
}

/// Notification kind written by the recent-events summary job.
pub const UPCOMING_EVENT_KIND: &str = "upcoming_event";

/// One generated notification, keyed by the event it describes.
///
/// Written by the summary job; regenerating for the same event refreshes
/// the row instead of duplicating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// The event this notification describes.
    pub event_id: EventId,
    /// The event owner the notification is addressed to.
    pub user_id: UserId,
    /// Notification kind, currently always [`UPCOMING_EVENT_KIND`].
    pub kind: String,
    /// Title copied from the event.
    pub title: String,
    /// UTC timestamp of the job run that last wrote this row.
    pub generated_at: String,
}
