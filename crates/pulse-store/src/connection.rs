//! SQLite connection pool construction.

use std::path::Path;

use r2d2_sqlite::SqliteConnectionManager;

use crate::errors::Result;

/// An r2d2 pool of SQLite connections.
pub type ConnectionPool = r2d2::Pool<SqliteConnectionManager>;

/// A checked-out pooled connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pragmas applied to every pooled connection.
///
/// WAL allows concurrent readers while a write transaction is open; the
/// busy timeout makes writers queue instead of failing with `SQLITE_BUSY`.
const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA busy_timeout = 5000;
PRAGMA foreign_keys = ON;
";

/// Open a connection pool for the database at `path`.
pub fn open_pool(path: &Path) -> Result<ConnectionPool> {
    let manager = SqliteConnectionManager::file(path)
        .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));
    Ok(r2d2::Pool::builder().max_size(8).build(manager)?)
}
