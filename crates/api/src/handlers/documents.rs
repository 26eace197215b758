//! Handlers for the document lifecycle: CRUD, status transitions, version
//! history, rollback, comparison, export, and integrity verification.
//!
//! Every state-changing path routes through the version store, so each
//! accepted edit produces a new checksummed, numbered snapshot (except the
//! explicit `bump = none` live-field update).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use coursedesk_core::checksum::sha256_hex;
use coursedesk_core::compare::{compare_versions, compute_line_diff};
use coursedesk_core::document::{
    duplicate_title, generate_slug, require_change_log, validate_content, validate_description,
    validate_slug, validate_title,
};
use coursedesk_core::error::CoreError;
use coursedesk_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use coursedesk_core::status::{marks_published, validate_transition, DocumentStatus};
use coursedesk_db::models::document::{CreateDocument, Document, UpdateDocument};
use coursedesk_db::models::document_version::{
    CompareRequest, CompareResponse, DocumentExport, DocumentVersion, VerifyRequest,
    VerifyResponse, VersionExportEntry,
};
use coursedesk_db::repositories::{DocumentRepo, DocumentVersionRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param types
-------------------------------------------------------------------------- */

#[derive(Debug, serde::Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch a document by slug or return 404.
async fn ensure_document_by_slug(pool: &sqlx::PgPool, slug: &str) -> AppResult<Document> {
    DocumentRepo::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document '{slug}' not found")))
}

/// Fetch a specific version of a document or return 404.
///
/// Lookups are scoped by document id, so a version of another document can
/// never be addressed through this path.
async fn ensure_version(
    pool: &sqlx::PgPool,
    document: &Document,
    version_number: &str,
) -> AppResult<DocumentVersion> {
    DocumentVersionRepo::find_by_document_and_number(pool, document.id, version_number)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Version {} not found for document '{}'",
                version_number, document.slug
            ))
        })
}

/// Parse a stored status string; a corrupt value is an internal error, not a
/// caller mistake.
fn parse_status(document: &Document) -> AppResult<DocumentStatus> {
    document.status.parse::<DocumentStatus>().map_err(|_| {
        AppError::InternalError(format!(
            "Document {} has corrupt status '{}'",
            document.id, document.status
        ))
    })
}

/// Apply a guarded status transition and surface concurrent changes as 409.
async fn transition(
    state: &AppState,
    actor: Actor,
    slug: &str,
    to: DocumentStatus,
) -> AppResult<Document> {
    let document = ensure_document_by_slug(&state.pool, slug).await?;
    let from = parse_status(&document)?;
    validate_transition(from, to).map_err(AppError::Core)?;

    let updated = DocumentRepo::update_status(
        &state.pool,
        document.id,
        from.as_str(),
        to.as_str(),
        marks_published(to),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Document status changed concurrently; retry".into(),
        ))
    })?;

    tracing::info!(
        actor_id = actor.id,
        document_id = document.id,
        slug = %slug,
        from = %from,
        to = %to,
        "Document status transitioned"
    );

    Ok(updated)
}

/* --------------------------------------------------------------------------
Document CRUD
-------------------------------------------------------------------------- */

/// GET /documents
///
/// List documents, most recently updated first.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let documents = DocumentRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// POST /documents
///
/// Create a new document in draft with its 1.0 snapshot. Generates the slug
/// from the title if not provided.
pub async fn create_document(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title).map_err(AppError::Core)?;
    validate_content(&input.content).map_err(AppError::Core)?;
    if let Some(ref description) = input.description {
        validate_description(description).map_err(AppError::Core)?;
    }

    let slug = match &input.slug {
        Some(s) => {
            validate_slug(s).map_err(AppError::Core)?;
            s.clone()
        }
        None => generate_slug(&input.title),
    };

    let document = DocumentRepo::create(&state.pool, &input, &slug, Some(actor.id)).await?;

    tracing::info!(
        actor_id = actor.id,
        document_id = document.id,
        slug = %document.slug,
        "Document created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /documents/{slug}
pub async fn get_document(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    Ok(Json(DataResponse { data: document }))
}

/// PUT /documents/{slug}
///
/// Update a document. With `bump` = minor/major a non-empty `change_log` is
/// required and a new snapshot is appended; with `bump` = none only the
/// document's live fields change.
pub async fn update_document(
    actor: Actor,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateDocument>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;

    if let Some(ref title) = input.title {
        validate_title(title).map_err(AppError::Core)?;
    }
    if let Some(ref content) = input.content {
        validate_content(content).map_err(AppError::Core)?;
    }
    if let Some(ref description) = input.description {
        validate_description(description).map_err(AppError::Core)?;
    }

    let change_log =
        require_change_log(input.bump, input.change_log.as_deref()).map_err(AppError::Core)?;

    let updated = match change_log {
        // Versioned edit: append a snapshot; the store refreshes the mirror.
        Some(message) => {
            let title = input.title.as_deref().unwrap_or(&document.title);
            let content = input.content.as_deref().unwrap_or(&document.content);
            let version = DocumentVersionRepo::create_snapshot(
                &state.pool,
                document.id,
                title,
                content,
                &message,
                input.bump,
                Some(actor.id),
            )
            .await?;

            if input.description.is_some() {
                DocumentRepo::update_fields(
                    &state.pool,
                    document.id,
                    None,
                    input.description.as_deref(),
                    None,
                )
                .await?;
            }

            tracing::info!(
                actor_id = actor.id,
                document_id = document.id,
                slug = %slug,
                version = %version.version_number,
                bump = %input.bump,
                "Document version created"
            );

            DocumentRepo::find_by_id(&state.pool, document.id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Document '{slug}' not found")))?
        }
        // Live-field edit: no snapshot trail.
        None => {
            let updated = DocumentRepo::update_fields(
                &state.pool,
                document.id,
                input.title.as_deref(),
                input.description.as_deref(),
                input.content.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document '{slug}' not found")))?;

            tracing::info!(
                actor_id = actor.id,
                document_id = document.id,
                slug = %slug,
                "Document fields updated without versioning"
            );

            updated
        }
    };

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /documents/{slug}
///
/// Delete a document and, by cascade, its entire version history.
pub async fn delete_document(
    actor: Actor,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    DocumentRepo::delete(&state.pool, document.id).await?;

    tracing::info!(
        actor_id = actor.id,
        document_id = document.id,
        slug = %slug,
        "Document deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Status lifecycle
-------------------------------------------------------------------------- */

/// POST /documents/{slug}/submit-review
pub async fn submit_for_review(
    actor: Actor,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let document = transition(&state, actor, &slug, DocumentStatus::Review).await?;
    Ok(Json(DataResponse { data: document }))
}

/// POST /documents/{slug}/publish
pub async fn publish_document(
    actor: Actor,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let document = transition(&state, actor, &slug, DocumentStatus::Published).await?;
    Ok(Json(DataResponse { data: document }))
}

/// POST /documents/{slug}/archive
pub async fn archive_document(
    actor: Actor,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let document = transition(&state, actor, &slug, DocumentStatus::Archived).await?;
    Ok(Json(DataResponse { data: document }))
}

/* --------------------------------------------------------------------------
Duplication
-------------------------------------------------------------------------- */

/// POST /documents/{slug}/duplicate
///
/// Copy a document's current content into a new draft document with a fresh
/// 1.0 snapshot.
pub async fn duplicate_document(
    actor: Actor,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let source = ensure_document_by_slug(&state.pool, &slug).await?;
    let current = DocumentVersionRepo::current_for_document(&state.pool, source.id)
        .await?
        .ok_or(AppError::Core(CoreError::NoCurrentVersion))?;

    let title = duplicate_title(&source.title);
    let copy_slug = generate_slug(&title);
    let copy =
        DocumentRepo::duplicate(&state.pool, &source, &current, &title, &copy_slug, Some(actor.id))
            .await?;

    tracing::info!(
        actor_id = actor.id,
        source_id = source.id,
        document_id = copy.id,
        slug = %copy.slug,
        "Document duplicated"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: copy })))
}

/* --------------------------------------------------------------------------
Versions
-------------------------------------------------------------------------- */

/// GET /documents/{slug}/versions
///
/// List a document's versions, oldest first.
pub async fn list_versions(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    let versions =
        DocumentVersionRepo::list_by_document_paged(&state.pool, document.id, limit, offset)
            .await?;
    Ok(Json(DataResponse { data: versions }))
}

/// GET /documents/{slug}/versions/{version}
pub async fn get_version(
    State(state): State<AppState>,
    Path((slug, version)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    let version = ensure_version(&state.pool, &document, &version).await?;
    Ok(Json(DataResponse { data: version }))
}

/// DELETE /documents/{slug}/versions/{version}
///
/// Permanently delete a historical snapshot. The current snapshot is
/// protected.
pub async fn delete_version(
    actor: Actor,
    State(state): State<AppState>,
    Path((slug, version)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    let snapshot = ensure_version(&state.pool, &document, &version).await?;

    if snapshot.is_current {
        return Err(AppError::Core(CoreError::CurrentVersionProtected));
    }
    // The statement re-checks the flag, so a concurrent flip cannot sneak a
    // current snapshot past the guard above.
    let deleted = DocumentVersionRepo::delete_non_current(&state.pool, snapshot.id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::CurrentVersionProtected));
    }

    tracing::info!(
        actor_id = actor.id,
        document_id = document.id,
        slug = %slug,
        version = %snapshot.version_number,
        "Document version deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /documents/{slug}/rollback/{version}
///
/// Restore a document to a historical version's content by appending a new
/// snapshot; history is never rewritten.
pub async fn rollback_document(
    actor: Actor,
    State(state): State<AppState>,
    Path((slug, version)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    let target = ensure_version(&state.pool, &document, &version).await?;

    let restored =
        DocumentVersionRepo::restore_version(&state.pool, document.id, &target, Some(actor.id))
            .await?;

    tracing::info!(
        actor_id = actor.id,
        document_id = document.id,
        slug = %slug,
        restored_to = %target.version_number,
        new_version = %restored.version_number,
        "Document rolled back"
    );

    Ok(Json(DataResponse { data: restored }))
}

/* --------------------------------------------------------------------------
Comparison
-------------------------------------------------------------------------- */

/// GET /documents/{slug}/versions/compare?v1=X&v2=Y
///
/// Compare two versions of a document. The result is independent of
/// argument order: the chronologically older version is always reported
/// first.
pub async fn compare_document_versions(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<CompareRequest>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    let a = ensure_version(&state.pool, &document, &params.v1).await?;
    let b = ensure_version(&state.pool, &document, &params.v2).await?;

    let comparison = compare_versions(
        a.version_ref().map_err(AppError::Core)?,
        b.version_ref().map_err(AppError::Core)?,
    )
    .map_err(AppError::Core)?;

    let response = CompareResponse {
        document_id: document.id,
        slug: document.slug,
        older: comparison.older.version_number.to_string(),
        newer: comparison.newer.version_number.to_string(),
        content_lines: compute_line_diff(comparison.older.content, comparison.newer.content),
        field_diffs: comparison.field_diffs,
    };

    Ok(Json(DataResponse { data: response }))
}

/* --------------------------------------------------------------------------
Export
-------------------------------------------------------------------------- */

/// GET /documents/{slug}/export
///
/// Export a document's full version history, oldest first. The entry shape
/// is a serialization contract consumed by downstream tooling verbatim.
pub async fn export_document(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    let versions = DocumentVersionRepo::list_by_document(&state.pool, document.id).await?;

    let export = DocumentExport {
        document_id: document.id,
        slug: document.slug,
        versions: versions.into_iter().map(VersionExportEntry::from).collect(),
    };

    Ok(Json(DataResponse { data: export }))
}

/* --------------------------------------------------------------------------
Integrity verification
-------------------------------------------------------------------------- */

/// POST /documents/{slug}/versions/{version}/verify
///
/// Recompute the digest of a stored snapshot and check it against the
/// supplied checksum, or against the stored one when none is supplied.
pub async fn verify_version(
    State(state): State<AppState>,
    Path((slug, version)): Path<(String, String)>,
    Json(input): Json<VerifyRequest>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document_by_slug(&state.pool, &slug).await?;
    let snapshot = ensure_version(&state.pool, &document, &version).await?;

    let expected = input.checksum.as_deref().unwrap_or(&snapshot.checksum);
    coursedesk_core::checksum::verify_checksum(&snapshot.content, expected)
        .map_err(AppError::Core)?;

    let response = VerifyResponse {
        document_id: document.id,
        version_number: snapshot.version_number,
        checksum: sha256_hex(snapshot.content.as_bytes()),
        verified: true,
    };

    Ok(Json(DataResponse { data: response }))
}
