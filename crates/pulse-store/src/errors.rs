//! Store error types.

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite-level failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool exhaustion or checkout failure.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Invariant violation inside the store itself.
    #[error("internal store error: {0}")]
    Internal(String),
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, StoreError>;
