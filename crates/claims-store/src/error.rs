//! Store error types.
//!
//! Every store operation returns a structured error. Operator-facing text
//! comes from [`StoreError::user_message`], which never includes SQL or
//! driver details.

use std::path::PathBuf;
use thiserror::Error;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database could not be opened.
    #[error("Failed to open claims database: {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The claims table has not been written yet.
    #[error("Claims database has not been loaded: {path}")]
    NotInitialized { path: PathBuf },

    /// Statement failed while writing the claims table.
    #[error("Failed to write claims table")]
    Write {
        #[source]
        source: rusqlite::Error,
    },

    /// Statement failed while reading.
    #[error("Claims query failed")]
    Query {
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub(crate) fn write(source: rusqlite::Error) -> Self {
        Self::Write { source }
    }

    pub(crate) fn query(source: rusqlite::Error) -> Self {
        Self::Query { source }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::Open { path, .. } => {
                format!("Could not open the claims database at {}", path.display())
            }
            Self::NotInitialized { path } => {
                format!(
                    "No claims have been loaded into {} yet. Run `claims ingest` first.",
                    path.display()
                )
            }
            Self::Write { .. } => "The claims could not be saved.".to_string(),
            Self::Query { .. } => "Internal error while reading claims.".to_string(),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
