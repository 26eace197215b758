//! Integration tests for the version store invariants:
//! - Minor/major bumps derive strictly increasing numbers from the current
//!   snapshot
//! - Exactly one snapshot per document is marked current after every write
//! - Rollback appends a forward-moving snapshot and mutates no history
//! - The current snapshot cannot be deleted; non-current snapshots can
//! - A corrupt persisted version number restarts numbering at 1.0

use sqlx::PgPool;

use coursedesk_core::version::VersionBump;
use coursedesk_db::models::document::CreateDocument;
use coursedesk_db::models::document_version::DocumentVersion;
use coursedesk_db::repositories::{DocumentRepo, DocumentVersionRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn setup_document(pool: &PgPool, slug: &str) -> coursedesk_db::models::document::Document {
    let input = CreateDocument {
        title: "Policy A".to_string(),
        slug: Some(slug.to_string()),
        description: None,
        content: "v1 text".to_string(),
    };
    DocumentRepo::create(pool, &input, slug, Some(1)).await.unwrap()
}

async fn snapshot(
    pool: &PgPool,
    document_id: i64,
    content: &str,
    change_log: &str,
    bump: VersionBump,
) -> DocumentVersion {
    DocumentVersionRepo::create_snapshot(
        pool,
        document_id,
        "Policy A",
        content,
        change_log,
        bump,
        Some(1),
    )
    .await
    .unwrap()
}

async fn current_count(pool: &PgPool, document_id: i64) -> i64 {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM document_versions WHERE document_id = $1 AND is_current = true",
    )
    .bind(document_id)
    .fetch_one(pool)
    .await
    .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// Test: minor and major bumps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_minor_and_major_bumps(pool: PgPool) {
    let document = setup_document(&pool, "bumps").await;

    let v11 = snapshot(&pool, document.id, "v2 text", "clarify wording", VersionBump::Minor).await;
    assert_eq!(v11.version_number, "1.1");
    assert!(v11.is_current);

    let v20 = snapshot(&pool, document.id, "v3 text", "restructure", VersionBump::Major).await;
    assert_eq!(v20.version_number, "2.0");

    // Exactly one current snapshot, and it is the newest.
    assert_eq!(current_count(&pool, document.id).await, 1);
    let current = DocumentVersionRepo::current_for_document(&pool, document.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, v20.id);

    // The superseded snapshots are unmarked but otherwise untouched.
    let history = DocumentVersionRepo::list_by_document(&pool, document.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].version_number, "1.0");
    assert_eq!(history[0].content, "v1 text");
    assert!(!history[0].is_current);
    assert_eq!(history[1].version_number, "1.1");
    assert_eq!(history[1].content, "v2 text");
    assert!(!history[1].is_current);
}

// ---------------------------------------------------------------------------
// Test: snapshot creation refreshes the document mirror
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_snapshot_refreshes_document_mirror(pool: PgPool) {
    let document = setup_document(&pool, "mirror").await;

    let v11 = DocumentVersionRepo::create_snapshot(
        &pool,
        document.id,
        "Policy A (renamed)",
        "v2 text",
        "rename and rewrite",
        VersionBump::Minor,
        None,
    )
    .await
    .unwrap();

    let reloaded = DocumentRepo::find_by_id(&pool, document.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.title, "Policy A (renamed)");
    assert_eq!(reloaded.content, "v2 text");
    assert_eq!(reloaded.current_version_id, Some(v11.id));
}

// ---------------------------------------------------------------------------
// Test: rollback appends, never rewrites
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rollback_creates_forward_entry(pool: PgPool) {
    let document = setup_document(&pool, "rollback").await;
    snapshot(&pool, document.id, "v2 text", "clarify wording", VersionBump::Minor).await;
    snapshot(&pool, document.id, "v3 text", "restructure", VersionBump::Major).await;

    let v10 = DocumentVersionRepo::find_by_document_and_number(&pool, document.id, "1.0")
        .await
        .unwrap()
        .unwrap();

    let restored = DocumentVersionRepo::restore_version(&pool, document.id, &v10, Some(1))
        .await
        .unwrap();

    // Rollback while current is 2.0 produces 2.1 with 1.0's content.
    assert_eq!(restored.version_number, "2.1");
    assert_eq!(restored.content, "v1 text");
    assert_eq!(restored.change_log, "Restored to version 1.0");
    assert!(restored.is_current);
    assert_eq!(restored.checksum, v10.checksum);

    // History grew by one; nothing was deleted or renumbered.
    let history = DocumentVersionRepo::list_by_document(&pool, document.id)
        .await
        .unwrap();
    let numbers: Vec<&str> = history.iter().map(|v| v.version_number.as_str()).collect();
    assert_eq!(numbers, vec!["1.0", "1.1", "2.0", "2.1"]);
    assert_eq!(current_count(&pool, document.id).await, 1);
}

// ---------------------------------------------------------------------------
// Test: deletion guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_guard(pool: PgPool) {
    let document = setup_document(&pool, "deletion").await;
    let v11 = snapshot(&pool, document.id, "v2 text", "clarify wording", VersionBump::Minor).await;
    let v20 = snapshot(&pool, document.id, "v3 text", "restructure", VersionBump::Major).await;

    // The current snapshot is protected.
    let deleted = DocumentVersionRepo::delete_non_current(&pool, v20.id)
        .await
        .unwrap();
    assert!(!deleted, "deleting the current snapshot must not succeed");
    assert!(DocumentVersionRepo::find_by_id(&pool, v20.id)
        .await
        .unwrap()
        .is_some());

    // A non-current snapshot deletes cleanly and leaves siblings alone.
    let deleted = DocumentVersionRepo::delete_non_current(&pool, v11.id)
        .await
        .unwrap();
    assert!(deleted);

    let history = DocumentVersionRepo::list_by_document(&pool, document.id)
        .await
        .unwrap();
    let numbers: Vec<&str> = history.iter().map(|v| v.version_number.as_str()).collect();
    assert_eq!(numbers, vec!["1.0", "2.0"]);
}

// ---------------------------------------------------------------------------
// Test: corrupt version numbers restart numbering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_corrupt_version_number_restarts_numbering(pool: PgPool) {
    let document = setup_document(&pool, "corrupt").await;

    // Corrupt the persisted number behind the repository's back.
    sqlx::query(
        "UPDATE document_versions SET version_number = 'garbage' \
         WHERE document_id = $1 AND is_current = true",
    )
    .bind(document.id)
    .execute(&pool)
    .await
    .unwrap();

    let next = snapshot(&pool, document.id, "recovered", "recover", VersionBump::Minor).await;
    assert_eq!(next.version_number, "1.0");
    assert_eq!(current_count(&pool, document.id).await, 1);
}

// ---------------------------------------------------------------------------
// Test: current lookup on a document created without the repository
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_current_lookup_on_never_saved_document(pool: PgPool) {
    // A bare row with no snapshots, as a legacy importer might leave behind.
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO documents (title, slug, content) VALUES ('Bare', 'bare', '') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let current = DocumentVersionRepo::current_for_document(&pool, row.0)
        .await
        .unwrap();
    assert!(current.is_none());
}
