//! Repository for the `document_versions` table: the sole writer of version
//! snapshot rows.
//!
//! Snapshot creation is the one concurrency-sensitive write in the service.
//! Two concurrent edits of the same document must not compute the same next
//! version number or leave zero/two rows marked current, so the whole
//! sequence runs in a single transaction over locked reads (see
//! [`DocumentVersionRepo::create_snapshot`]).

use sqlx::{PgConnection, PgPool};

use coursedesk_core::checksum::{content_length, file_size_bytes, sha256_hex};
use coursedesk_core::types::DbId;
use coursedesk_core::version::{VersionBump, VersionNumber};

use crate::models::document_version::DocumentVersion;

/// Column list for document_versions queries.
const COLUMNS: &str = "id, document_id, version_number, title, content, change_log, \
    is_current, checksum, content_length, file_size_bytes, created_by, created_at";

/// Provides create, read, and delete operations for version snapshots.
pub struct DocumentVersionRepo;

impl DocumentVersionRepo {
    /// Insert a snapshot row marked current, computing its checksum and
    /// sizes. Callers are responsible for transaction scope and for
    /// unmarking the prior current row.
    pub(crate) async fn insert_snapshot(
        conn: &mut PgConnection,
        document_id: DbId,
        version_number: &str,
        title: &str,
        content: &str,
        change_log: &str,
        created_by: Option<DbId>,
    ) -> Result<DocumentVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_versions
                (document_id, version_number, title, content, change_log,
                 is_current, checksum, content_length, file_size_bytes, created_by)
             VALUES ($1, $2, $3, $4, $5, true, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(version_number)
            .bind(title)
            .bind(content)
            .bind(change_log)
            .bind(sha256_hex(content.as_bytes()))
            .bind(content_length(content))
            .bind(file_size_bytes(content))
            .bind(created_by)
            .fetch_one(conn)
            .await
    }

    /// Create a new snapshot and make it current, atomically.
    ///
    /// Within one transaction: locks the document row, re-reads the current
    /// snapshot `FOR UPDATE`, computes the next number from that locked
    /// read, unmarks the prior current, inserts the new row as current, and
    /// refreshes the document's denormalized fields and current-version
    /// pointer. Everything commits or rolls back together, so a failed edit
    /// never leaves a document without a current version.
    ///
    /// A corrupt persisted version number restarts numbering at `1.0`
    /// instead of failing the edit; this is logged as a data-integrity
    /// warning.
    pub async fn create_snapshot(
        pool: &PgPool,
        document_id: DbId,
        title: &str,
        content: &str,
        change_log: &str,
        bump: VersionBump,
        created_by: Option<DbId>,
    ) -> Result<DocumentVersion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Serialize concurrent edits on the owning document.
        sqlx::query("SELECT id FROM documents WHERE id = $1 FOR UPDATE")
            .bind(document_id)
            .execute(&mut *tx)
            .await?;

        let current: Option<(String,)> = sqlx::query_as(
            "SELECT version_number FROM document_versions \
             WHERE document_id = $1 AND is_current = true \
             FOR UPDATE",
        )
        .bind(document_id)
        .fetch_optional(&mut *tx)
        .await?;

        let next = match current {
            None => VersionNumber::FIRST,
            Some((raw,)) => match raw.parse::<VersionNumber>() {
                Ok(version) => version
                    .next(bump)
                    .map_err(|e| sqlx::Error::Protocol(e.to_string()))?,
                Err(_) => {
                    tracing::warn!(
                        document_id,
                        version_number = %raw,
                        "Corrupt version number on current snapshot; restarting numbering at 1.0"
                    );
                    VersionNumber::FIRST
                }
            },
        };

        // Unmark the prior current snapshot. The new row and this flip
        // commit together; readers never see zero or two current rows.
        sqlx::query(
            "UPDATE document_versions SET is_current = false \
             WHERE document_id = $1 AND is_current = true",
        )
        .bind(document_id)
        .execute(&mut *tx)
        .await?;

        let version = Self::insert_snapshot(
            &mut *tx,
            document_id,
            &next.to_string(),
            title,
            content,
            change_log,
            created_by,
        )
        .await?;

        // Keep the document's join-free mirror and pointer in sync.
        sqlx::query(
            "UPDATE documents SET \
                title = $2, \
                content = $3, \
                current_version_id = $4, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(document_id)
        .bind(title)
        .bind(content)
        .bind(version.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(version)
    }

    /// Restore a document to a historical snapshot's content by creating a
    /// new snapshot. History is never deleted, reordered, or mutated: the
    /// rollback shows up as a forward-moving minor bump over the current
    /// version.
    pub async fn restore_version(
        pool: &PgPool,
        document_id: DbId,
        target: &DocumentVersion,
        created_by: Option<DbId>,
    ) -> Result<DocumentVersion, sqlx::Error> {
        let change_log = format!("Restored to version {}", target.version_number);
        Self::create_snapshot(
            pool,
            document_id,
            &target.title,
            &target.content,
            &change_log,
            VersionBump::Minor,
            created_by,
        )
        .await
    }

    /// Find a snapshot by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DocumentVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_versions WHERE id = $1");
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a specific version of a document by its serialized number.
    pub async fn find_by_document_and_number(
        pool: &PgPool,
        document_id: DbId,
        version_number: &str,
    ) -> Result<Option<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions \
             WHERE document_id = $1 AND version_number = $2"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(version_number)
            .fetch_optional(pool)
            .await
    }

    /// List all snapshots of a document, oldest first.
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions \
             WHERE document_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Page through a document's snapshots, oldest first.
    pub async fn list_by_document_paged(
        pool: &PgPool,
        document_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions \
             WHERE document_id = $1 \
             ORDER BY created_at ASC, id ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The current snapshot of a document, if it has ever been saved.
    pub async fn current_for_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Option<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions \
             WHERE document_id = $1 AND is_current = true"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a non-current snapshot. Returns `true` if a row
    /// was removed.
    ///
    /// The `is_current = false` guard is part of the statement so the
    /// current snapshot stays protected even against a concurrent flip.
    /// Deletion never renumbers or otherwise touches sibling snapshots.
    pub async fn delete_non_current(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM document_versions WHERE id = $1 AND is_current = false")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of snapshots a document owns.
    pub async fn count_by_document(pool: &PgPool, document_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM document_versions WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
