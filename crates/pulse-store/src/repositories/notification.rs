//! Notification repository — rows in the `notifications` table.

use rusqlite::{Connection, Row, params};

use pulse_core::events::NotificationRecord;
use pulse_core::ids::{EventId, UserId};

use crate::errors::Result;

/// Notification repository — stateless, every method takes `&Connection`.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert one notification, refreshing it when the event already has one.
    ///
    /// `event_id` is the primary key, so a rerun of the summary job updates
    /// the existing row instead of producing a duplicate.
    pub fn upsert(conn: &Connection, record: &NotificationRecord) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO notifications (event_id, user_id, kind, title, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(event_id) DO UPDATE SET
                 kind = excluded.kind,
                 title = excluded.title,
                 generated_at = excluded.generated_at",
            params![
                record.event_id.as_str(),
                record.user_id.as_str(),
                record.kind,
                record.title,
                record.generated_at,
            ],
        )?;
        Ok(())
    }

    /// List one user's notifications in generation order.
    pub fn list_by_user(conn: &Connection, user_id: &UserId) -> Result<Vec<NotificationRecord>> {
        let mut stmt = conn.prepare(
            "SELECT event_id, user_id, kind, title, generated_at
             FROM notifications WHERE user_id = ?1
             ORDER BY generated_at, event_id",
        )?;
        let rows = stmt
            .query_map(params![user_id.as_str()], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<NotificationRecord> {
        Ok(NotificationRecord {
            event_id: EventId::new(row.get::<_, String>(0)?),
            user_id: UserId::new(row.get::<_, String>(1)?),
            kind: row.get(2)?,
            title: row.get(3)?,
            generated_at: row.get(4)?,
        })
    }
}
