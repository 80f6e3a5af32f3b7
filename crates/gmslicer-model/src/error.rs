//! Error types for the model crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading a model snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshot file could not be read.
    #[error("Failed to read snapshot: {0}")]
    IoError(#[from] io::Error),

    /// The snapshot is not valid JSON for the expected layout.
    #[error("Invalid snapshot: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Two features share a tag.
    #[error("Duplicate feature tag: {0}")]
    DuplicateTag(String),
}

/// Result type alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
