use std::path::PathBuf;

use xtad_types::ObjectId;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object's metadata file does not exist.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// A record file below the stated record count is missing.
    #[error("record {index} of {id} not found")]
    RecordNotFound { id: ObjectId, index: usize },

    /// Metadata parsed but is missing required fields or is malformed.
    #[error("invalid state in {path}: {reason}")]
    InvalidState { path: PathBuf, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// `true` for both a missing object and a missing record file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::RecordNotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
