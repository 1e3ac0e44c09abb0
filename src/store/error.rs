//! Record store error types
//!
//! Everything that can go wrong while fetching or seeding records.

use thiserror::Error;

/// Errors raised by a record store adapter
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite operation failed
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row could not be mapped onto a record
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Connection lock was poisoned by a panicking writer
    #[error("Lock error: {0}")]
    Lock(String),

    /// Blocking task was cancelled or panicked
    #[error("Task error: {0}")]
    Task(String),

    /// I/O operation failed (opening the database file, reading imports)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Corrupt("unknown time context 'Snack'".to_string());
        assert_eq!(err.to_string(), "Corrupt record: unknown time context 'Snack'");
    }

    #[test]
    fn test_sqlite_error_conversion() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }
}
