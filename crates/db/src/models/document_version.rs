//! Immutable version snapshot model and the serialization contracts built
//! from it (export, comparison, verification).
//!
//! Snapshots are created on every versioned edit and never mutated afterward,
//! except for the one-way `is_current` flip when a newer snapshot lands.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use coursedesk_core::compare::{DiffLine, FieldDiff, VersionRef};
use coursedesk_core::error::CoreError;
use coursedesk_core::types::{DbId, Timestamp};
use coursedesk_core::version::VersionNumber;

/// A row from the `document_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentVersion {
    pub id: DbId,
    pub document_id: DbId,
    pub version_number: String,
    pub title: String,
    pub content: String,
    pub change_log: String,
    pub is_current: bool,
    pub checksum: String,
    pub content_length: i64,
    pub file_size_bytes: i64,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

impl DocumentVersion {
    /// Borrow the fields the comparison engine needs.
    ///
    /// Fails with a validation error when the persisted version number is
    /// corrupt; comparison has no meaningful order for such rows.
    pub fn version_ref(&self) -> Result<VersionRef<'_>, CoreError> {
        let version_number: VersionNumber = self.version_number.parse()?;
        Ok(VersionRef {
            document_id: self.document_id,
            version_number,
            created_at: self.created_at,
            title: &self.title,
            content: &self.content,
        })
    }
}

/// One entry of a document's export payload.
///
/// Field names and contents are a serialization contract consumed verbatim
/// by downstream tooling; do not rename or reorder without coordinating.
#[derive(Debug, Serialize)]
pub struct VersionExportEntry {
    pub version_number: String,
    pub title: String,
    pub content_length: i64,
    pub change_log: String,
    pub is_current: bool,
    pub file_size: i64,
    pub checksum: String,
    pub created_at: Timestamp,
    pub created_by: Option<DbId>,
}

impl From<DocumentVersion> for VersionExportEntry {
    fn from(v: DocumentVersion) -> Self {
        Self {
            version_number: v.version_number,
            title: v.title,
            content_length: v.content_length,
            change_log: v.change_log,
            is_current: v.is_current,
            file_size: v.file_size_bytes,
            checksum: v.checksum,
            created_at: v.created_at,
            created_by: v.created_by,
        }
    }
}

/// Export payload for a document: its versions ordered oldest first.
#[derive(Debug, Serialize)]
pub struct DocumentExport {
    pub document_id: DbId,
    pub slug: String,
    pub versions: Vec<VersionExportEntry>,
}

/// Query params for comparing two versions of a document.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub v1: String,
    pub v2: String,
}

/// Response for a version comparison.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub document_id: DbId,
    pub slug: String,
    pub older: String,
    pub newer: String,
    pub field_diffs: Vec<FieldDiff>,
    /// Line-level diff of the content field, oldest side on the left.
    pub content_lines: Vec<DiffLine>,
}

/// Request body for integrity verification of a stored snapshot.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// Externally recorded digest to check against. When absent, the stored
    /// checksum is verified against a fresh digest of the stored content.
    pub checksum: Option<String>,
}

/// Response for integrity verification.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub document_id: DbId,
    pub version_number: String,
    pub checksum: String,
    pub verified: bool,
}
