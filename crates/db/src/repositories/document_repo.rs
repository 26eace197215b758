//! Repository for the `documents` table.
//!
//! Document creation and duplication also materialize the first version
//! snapshot, so both run inside a transaction: a committed document always
//! has a current version.

use sqlx::PgPool;

use coursedesk_core::document::INITIAL_CHANGE_LOG;
use coursedesk_core::status::INITIAL_STATUS;
use coursedesk_core::types::DbId;
use coursedesk_core::version::VersionNumber;

use crate::models::document::{CreateDocument, Document};
use crate::models::document_version::DocumentVersion;
use crate::repositories::document_version_repo::DocumentVersionRepo;

/// Column list for documents queries.
const COLUMNS: &str = "id, title, slug, description, content, status, \
    current_version_id, published_at, created_by, created_at, updated_at";

/// Provides CRUD and lifecycle operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Create a new document in `draft` together with its `1.0` snapshot.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
        slug: &str,
        created_by: Option<DbId>,
    ) -> Result<Document, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO documents (title, slug, description, content, status, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.description)
            .bind(&input.content)
            .bind(INITIAL_STATUS.as_str())
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let version = DocumentVersionRepo::insert_snapshot(
            &mut *tx,
            document.id,
            &VersionNumber::FIRST.to_string(),
            &input.title,
            &input.content,
            INITIAL_CHANGE_LOG,
            created_by,
        )
        .await?;

        let query = format!(
            "UPDATE documents SET current_version_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(document.id)
            .bind(version.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(document)
    }

    /// Find a document by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a document by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE slug = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List documents, most recently updated first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             ORDER BY updated_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a document's live fields without touching version history.
    ///
    /// This is the `bump = none` path: only the denormalized mirror changes,
    /// so such edits leave no snapshot trail.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        title: Option<&str>,
        description: Option<&str>,
        content: Option<&str>,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                content = COALESCE($4, content),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Transition a document's status, compare-and-set style.
    ///
    /// The `status = $2` guard makes concurrent transitions visible: if the
    /// status changed under us the update matches no row and `None` is
    /// returned. `published_at` is stamped only on the first entry into
    /// `published`, preserving first-published provenance across later
    /// transitions.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        mark_published: bool,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET
                status = $3,
                published_at = CASE
                    WHEN $4 AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END,
                updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(mark_published)
            .fetch_optional(pool)
            .await
    }

    /// Create a copy of a document seeded with a fresh `1.0` snapshot of the
    /// source's current content. The copy starts in `draft` regardless of
    /// the source's status.
    pub async fn duplicate(
        pool: &PgPool,
        source: &Document,
        current: &DocumentVersion,
        title: &str,
        slug: &str,
        created_by: Option<DbId>,
    ) -> Result<Document, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO documents (title, slug, description, content, status, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(title)
            .bind(slug)
            .bind(&source.description)
            .bind(&current.content)
            .bind(INITIAL_STATUS.as_str())
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let change_log = format!("Duplicated from '{}'", source.slug);
        let version = DocumentVersionRepo::insert_snapshot(
            &mut *tx,
            document.id,
            &VersionNumber::FIRST.to_string(),
            title,
            &current.content,
            &change_log,
            created_by,
        )
        .await?;

        let query = format!(
            "UPDATE documents SET current_version_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(document.id)
            .bind(version.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(document)
    }

    /// Delete a document; its snapshots cascade. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
