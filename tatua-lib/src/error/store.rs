//! Ticket store error types

use std::path::PathBuf;

/// Errors that can occur while loading or saving tickets.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file does not contain a ticket collection.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The ticket collection could not be serialized.
    #[error("Failed to serialize tickets: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No ticket with the given ID exists.
    #[error("Ticket {id} not found")]
    NotFound { id: u64 },
}

impl StoreError {
    /// Creates a new I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new parse error for the given path.
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
