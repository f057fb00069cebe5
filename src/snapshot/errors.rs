//! Snapshot loading errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot loading errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unknown collection '{0}'")]
    CollectionNotFound(String),

    #[error("failed to read snapshot file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot format: {0}")]
    InvalidFormat(String),
}
