//! Document record and DTO models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use coursedesk_core::types::{DbId, Timestamp};
use coursedesk_core::version::VersionBump;

/// A row from the `documents` table.
///
/// `title`, `description`, and `content` mirror the current snapshot so read
/// paths need no join; version history remains the source of truth.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: String,
    pub status: String,
    pub current_version_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new document.
#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub title: String,
    /// Auto-generated from title if `None`.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: String,
}

/// DTO for updating an existing document.
#[derive(Debug, Deserialize)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    /// How to derive the next version number. `none` updates the record's
    /// live fields without appending a snapshot.
    #[serde(default)]
    pub bump: VersionBump,
    pub change_log: Option<String>,
}
