//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the task and session store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the requested id.
    #[error("{0}")]
    NotFound(String),

    /// The request was rejected before touching the database.
    #[error("{0}")]
    Validation(String),

    /// SQLite reported an error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No data directory could be determined for the default database path.
    #[error("could not determine a data directory; pass --db or set FOCUSTOOLS_DB")]
    NoDataDir,

    /// Creating the database directory failed.
    #[error("failed to create database directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn task_not_found() -> Self {
        Self::NotFound("Task not found".to_string())
    }

    /// Returns true for errors caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation(_))
    }
}
