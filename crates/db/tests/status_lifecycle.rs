//! Integration tests for status transitions at the storage layer:
//! - `published_at` is stamped once, on the first entry into `published`
//! - Archival preserves the publish timestamp
//! - The compare-and-set guard surfaces concurrent transitions

use sqlx::PgPool;

use coursedesk_db::models::document::CreateDocument;
use coursedesk_db::repositories::DocumentRepo;

async fn setup_document(pool: &PgPool, slug: &str) -> coursedesk_db::models::document::Document {
    let input = CreateDocument {
        title: "Lifecycle".to_string(),
        slug: Some(slug.to_string()),
        description: None,
        content: "text".to_string(),
    };
    DocumentRepo::create(pool, &input, slug, None).await.unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_for_review(pool: PgPool) {
    let document = setup_document(&pool, "review-flow").await;

    let reviewed = DocumentRepo::update_status(&pool, document.id, "draft", "review", false)
        .await
        .unwrap()
        .expect("transition should apply");
    assert_eq!(reviewed.status, "review");
    assert!(reviewed.published_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_sets_published_at_once(pool: PgPool) {
    let document = setup_document(&pool, "publish-flow").await;

    let published = DocumentRepo::update_status(&pool, document.id, "draft", "published", true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(published.status, "published");
    let first_published_at = published
        .published_at
        .expect("publish must stamp published_at");

    // Archival keeps the original timestamp for audit.
    let archived = DocumentRepo::update_status(&pool, document.id, "published", "archived", false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(archived.status, "archived");
    assert_eq!(archived.published_at, Some(first_published_at));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cas_guard_detects_concurrent_transition(pool: PgPool) {
    let document = setup_document(&pool, "cas-flow").await;

    let first = DocumentRepo::update_status(&pool, document.id, "draft", "review", false)
        .await
        .unwrap();
    assert!(first.is_some());

    // A second writer still believing the document is in draft loses.
    let second = DocumentRepo::update_status(&pool, document.id, "draft", "published", true)
        .await
        .unwrap();
    assert!(second.is_none(), "stale transition must not apply");

    let reloaded = DocumentRepo::find_by_id(&pool, document.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, "review");
}
