use thiserror::Error;

use crate::models::DocumentId;

/// Main error type for proximity index operations
#[derive(Error, Debug)]
pub enum ProximityError {
    #[error("Can't sort by {index} unless a center point is provided in the query.")]
    MissingCenter { index: String },

    #[error("Write conflict on document {doc_id}: {reason}")]
    WriteConflict { doc_id: DocumentId, reason: String },

    #[error("Document {doc_id} is not indexed by {index}")]
    DocumentNotIndexed { index: String, doc_id: DocumentId },

    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Result type alias for proximity index operations
pub type Result<T> = std::result::Result<T, ProximityError>;

impl ProximityError {
    /// Build a write conflict for `doc_id`
    pub fn conflict(doc_id: DocumentId, reason: impl Into<String>) -> Self {
        ProximityError::WriteConflict {
            doc_id,
            reason: reason.into(),
        }
    }

    /// Check if the host's retry layer should redo the whole logical operation
    pub fn is_retriable(&self) -> bool {
        matches!(self, ProximityError::WriteConflict { .. })
    }
}
