//! Event repository — rows in the `events` table.

use rusqlite::{Connection, Row, params};

use pulse_core::events::EventRecord;
use pulse_core::ids::{EventId, UserId};

use crate::errors::Result;

/// Event repository — stateless, every method takes `&Connection`.
pub struct EventRepo;

impl EventRepo {
    /// Insert one event row. The record's ID and timestamp are assigned by
    /// the caller ([`crate::store::EventStore::create_event`]) so the row
    /// matches the returned record exactly.
    pub fn insert(conn: &Connection, record: &EventRecord) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO events (id, title, description, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.as_str(),
                record.title,
                record.description,
                record.user_id.as_str(),
                record.created_at,
            ],
        )?;
        Ok(())
    }

    /// List one user's events in creation order.
    pub fn list_by_user(conn: &Connection, user_id: &UserId) -> Result<Vec<EventRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, description, user_id, created_at
             FROM events WHERE user_id = ?1
             ORDER BY created_at, id",
        )?;
        let rows = stmt
            .query_map(params![user_id.as_str()], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// List every event created at or after `since`, across all users.
    ///
    /// Timestamps are stored in one fixed-width RFC 3339 format, so string
    /// comparison orders them correctly.
    pub fn list_since(conn: &Connection, since: &str) -> Result<Vec<EventRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, description, user_id, created_at
             FROM events WHERE created_at >= ?1
             ORDER BY created_at, id",
        )?;
        let rows = stmt
            .query_map(params![since], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<EventRecord> {
        Ok(EventRecord {
            id: EventId::new(row.get::<_, String>(0)?),
            title: row.get(1)?,
            description: row.get(2)?,
            user_id: UserId::new(row.get::<_, String>(3)?),
            created_at: row.get(4)?,
        })
    }
}
