//! Integration tests for document CRUD against a real database:
//! - Create materializes the document and its `1.0` snapshot atomically
//! - Lookup by slug
//! - `update_fields` mutates only the denormalized mirror, never history
//! - Duplicate seeds a fresh `1.0` snapshot and resets status to draft
//! - Delete cascades to all snapshots

use sqlx::PgPool;

use coursedesk_core::checksum::sha256_hex;
use coursedesk_db::models::document::CreateDocument;
use coursedesk_db::repositories::{DocumentRepo, DocumentVersionRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_document(title: &str, slug: &str, content: &str) -> CreateDocument {
    CreateDocument {
        title: title.to_string(),
        slug: Some(slug.to_string()),
        description: Some("test fixture".to_string()),
        content: content.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: create materializes document + first snapshot
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_document_with_first_snapshot(pool: PgPool) {
    let input = new_document("Grading Policy", "grading-policy", "v1 text");
    let document = DocumentRepo::create(&pool, &input, "grading-policy", Some(7))
        .await
        .unwrap();

    assert!(document.id > 0);
    assert_eq!(document.status, "draft");
    assert_eq!(document.title, "Grading Policy");
    assert_eq!(document.content, "v1 text");
    assert!(document.published_at.is_none());
    assert_eq!(document.created_by, Some(7));

    let current = DocumentVersionRepo::current_for_document(&pool, document.id)
        .await
        .unwrap()
        .expect("a freshly created document must have a current version");
    assert_eq!(document.current_version_id, Some(current.id));
    assert_eq!(current.version_number, "1.0");
    assert!(current.is_current);
    assert_eq!(current.change_log, "Initial version");
    assert_eq!(current.checksum, sha256_hex(b"v1 text"));
    assert_eq!(current.content_length, 7);
    assert_eq!(current.file_size_bytes, 7);
    assert_eq!(current.created_by, Some(7));
}

// ---------------------------------------------------------------------------
// Test: find_by_slug
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_slug(pool: PgPool) {
    let input = new_document("Course Handbook", "course-handbook", "contents");
    let created = DocumentRepo::create(&pool, &input, "course-handbook", None)
        .await
        .unwrap();

    let found = DocumentRepo::find_by_slug(&pool, "course-handbook")
        .await
        .unwrap()
        .expect("document should be found by slug");
    assert_eq!(found.id, created.id);

    let missing = DocumentRepo::find_by_slug(&pool, "no-such-slug")
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Test: update_fields leaves version history untouched
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_fields_leaves_history_untouched(pool: PgPool) {
    let input = new_document("Policy", "policy", "original");
    let document = DocumentRepo::create(&pool, &input, "policy", None)
        .await
        .unwrap();

    let updated = DocumentRepo::update_fields(&pool, document.id, None, None, Some("patched"))
        .await
        .unwrap()
        .expect("document exists");
    assert_eq!(updated.content, "patched");
    assert_eq!(updated.title, "Policy");

    // No snapshot was appended and the existing one is untouched.
    let count = DocumentVersionRepo::count_by_document(&pool, document.id)
        .await
        .unwrap();
    assert_eq!(count, 1);
    let current = DocumentVersionRepo::current_for_document(&pool, document.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.content, "original");
}

// ---------------------------------------------------------------------------
// Test: duplicate copies current content, resets status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_resets_status_and_seeds_first_version(pool: PgPool) {
    let input = new_document("Syllabus", "syllabus", "week plan");
    let source = DocumentRepo::create(&pool, &input, "syllabus", None)
        .await
        .unwrap();

    // Publish the source so we can observe the status reset.
    let source = DocumentRepo::update_status(&pool, source.id, "draft", "published", true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(source.status, "published");

    let current = DocumentVersionRepo::current_for_document(&pool, source.id)
        .await
        .unwrap()
        .unwrap();

    let copy = DocumentRepo::duplicate(
        &pool,
        &source,
        &current,
        "Syllabus (copy)",
        "syllabus-copy",
        Some(3),
    )
    .await
    .unwrap();

    assert_ne!(copy.id, source.id);
    assert_eq!(copy.status, "draft");
    assert_eq!(copy.slug, "syllabus-copy");
    assert_eq!(copy.content, "week plan");
    assert!(copy.published_at.is_none());

    let copy_current = DocumentVersionRepo::current_for_document(&pool, copy.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy_current.version_number, "1.0");
    assert_eq!(copy_current.content, "week plan");
    assert_eq!(copy_current.change_log, "Duplicated from 'syllabus'");
}

// ---------------------------------------------------------------------------
// Test: delete cascades to snapshots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_versions(pool: PgPool) {
    let input = new_document("Old Notes", "old-notes", "v1");
    let document = DocumentRepo::create(&pool, &input, "old-notes", None)
        .await
        .unwrap();
    DocumentVersionRepo::create_snapshot(
        &pool,
        document.id,
        "Old Notes",
        "v2",
        "second pass",
        coursedesk_core::version::VersionBump::Minor,
        None,
    )
    .await
    .unwrap();

    let deleted = DocumentRepo::delete(&pool, document.id).await.unwrap();
    assert!(deleted);

    assert!(DocumentRepo::find_by_id(&pool, document.id)
        .await
        .unwrap()
        .is_none());
    let remaining = DocumentVersionRepo::count_by_document(&pool, document.id)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

// ---------------------------------------------------------------------------
// Test: list orders by most recently updated
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_documents(pool: PgPool) {
    for (title, slug) in [("A", "doc-a"), ("B", "doc-b"), ("C", "doc-c")] {
        DocumentRepo::create(&pool, &new_document(title, slug, "x"), slug, None)
            .await
            .unwrap();
    }

    let listed = DocumentRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(listed.len(), 3);

    let page = DocumentRepo::list(&pool, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
}
