//! High-level transactional `EventStore` API.
//!
//! Composes the repositories into atomic operations. Every write runs
//! inside a single SQLite transaction — callers never observe partial
//! state: an event row and its owner's analytics increment land together
//! or not at all.

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use pulse_core::events::{
    EventRecord, NewEvent, NotificationRecord, UPCOMING_EVENT_KIND, format_timestamp,
};
use pulse_core::ids::{EventId, UserId};

use crate::connection::{ConnectionPool, open_pool};
use crate::errors::Result;
use crate::repositories::{AnalyticsRepo, EventRepo, NotificationRepo};
use crate::schema;

/// Event store wrapping a connection pool and the repositories.
pub struct EventStore {
    pool: ConnectionPool,
}

impl EventStore {
    /// Open (or create) the database at `path` and run the migration.
    pub fn open(path: &Path) -> Result<Self> {
        let pool = open_pool(path)?;
        schema::migrate(&*pool.get()?)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool. The schema must already be migrated.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Persist a new event for `user_id`.
    ///
    /// Assigns the ID and the UTC timestamp, inserts the row, and
    /// increments the owner's analytics counter — all in one transaction.
    /// The input is assumed validated; see [`NewEvent::validate`].
    pub fn create_event(&self, user_id: &UserId, event: &NewEvent) -> Result<EventRecord> {
        let record = EventRecord {
            id: EventId::generate(),
            title: event.title.clone(),
            description: event.description.clone(),
            user_id: user_id.clone(),
            created_at: format_timestamp(Utc::now()),
        };

        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        EventRepo::insert(&tx, &record)?;
        AnalyticsRepo::increment(&tx, user_id)?;
        tx.commit()?;

        debug!(event_id = %record.id, user_id = %user_id, "event persisted");
        Ok(record)
    }

    /// One user's events in creation order.
    pub fn list_events(&self, user_id: &UserId) -> Result<Vec<EventRecord>> {
        EventRepo::list_by_user(&*self.pool.get()?, user_id)
    }

    /// The user's total event count, 0 when the user has never created one.
    pub fn total_events(&self, user_id: &UserId) -> Result<u64> {
        AnalyticsRepo::total(&*self.pool.get()?, user_id)
    }

    /// Generate `upcoming_event` notifications for recent events.
    ///
    /// Scans events created within the last `window_hours` and upserts one
    /// notification per event, all in one transaction. Notifications are
    /// keyed by event ID, so a rerun refreshes rows instead of duplicating
    /// them. Returns how many events the run covered.
    pub fn generate_upcoming_notifications(&self, window_hours: u32) -> Result<u64> {
        let since = format_timestamp(Utc::now() - chrono::Duration::hours(i64::from(window_hours)));
        let generated_at = format_timestamp(Utc::now());

        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let recent = EventRepo::list_since(&tx, &since)?;
        for event in &recent {
            NotificationRepo::upsert(
                &tx,
                &NotificationRecord {
                    event_id: event.id.clone(),
                    user_id: event.user_id.clone(),
                    kind: UPCOMING_EVENT_KIND.to_string(),
                    title: event.title.clone(),
                    generated_at: generated_at.clone(),
                },
            )?;
        }
        tx.commit()?;

        let count = recent.len() as u64;
        debug!(generated = count, window_hours, "upcoming notifications generated");
        Ok(count)
    }

    /// One user's generated notifications.
    pub fn list_notifications(&self, user_id: &UserId) -> Result<Vec<NotificationRecord>> {
        NotificationRepo::list_by_user(&*self.pool.get()?, user_id)
    }
}
