//! Error types for the permission registry.

use thiserror::Error;

/// Errors that can occur during permission store operations.
///
/// No failure affecting an acceptance decision is absorbed here; every
/// variant surfaces to the caller, which decides reject vs. retry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Permission record absent.
    #[error("permission record not found: instance {instance}, table {table}")]
    NotFound { instance: u64, table: String },

    /// A governed table was declared twice.
    #[error("permission record already exists: instance {instance}, table {table}")]
    AlreadyExists { instance: u64, table: String },

    /// The namespace for this instance has not been provisioned.
    #[error("namespace not provisioned for instance {0}")]
    NotProvisioned(u64),

    /// The supplied rollback version is behind the stored one.
    #[error("stale rollback version for table {table}: stored {stored}, supplied {supplied}")]
    StaleVersion {
        table: String,
        stored: u64,
        supplied: u64,
    },

    /// The stored permission document could not be parsed.
    #[error("invalid permission document: {0}")]
    InvalidDocument(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Process-level fault: a failed blocking task, a poisoned lock, or a
    /// write abandoned by its caller. Not a database error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidDocument(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
