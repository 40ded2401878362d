//! Analytics repository — per-user event counters.

use rusqlite::{Connection, OptionalExtension, params};

use pulse_core::ids::UserId;

use crate::errors::Result;

/// Analytics repository — stateless, every method takes `&Connection`.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Increment the user's counter, creating the row on first event.
    pub fn increment(conn: &Connection, user_id: &UserId) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO analytics (user_id, total_events) VALUES (?1, 1)
             ON CONFLICT(user_id) DO UPDATE SET total_events = total_events + 1",
            params![user_id.as_str()],
        )?;
        Ok(())
    }

    /// Current counter value, 0 when the user has no row.
    pub fn total(conn: &Connection, user_id: &UserId) -> Result<u64> {
        let total: Option<i64> = conn
            .query_row(
                "SELECT total_events FROM analytics WHERE user_id = ?1",
                params![user_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(total.map_or(0, |t| u64::try_from(t).unwrap_or(0)))
    }
}
