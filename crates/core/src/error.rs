use crate::status::DocumentStatus;
use crate::types::DbId;

/// Domain error taxonomy for the document engine.
///
/// Every variant is a recoverable, caller-facing condition. The API layer
/// surfaces these unchanged; nothing here is ever downgraded to a generic
/// failure on the way out.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A change log message is required when creating a new version")]
    MissingChangeLog,

    #[error("Cannot transition document from '{from}' to '{to}'")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    #[error("The current version of a document cannot be deleted")]
    CurrentVersionProtected,

    #[error("Document has no current version; it has never been saved")]
    NoCurrentVersion,

    #[error("Cannot compare versions belonging to different documents")]
    CrossDocumentComparison,

    #[error("Checksum mismatch: expected {expected}, computed {computed}")]
    IntegrityMismatch { expected: String, computed: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
