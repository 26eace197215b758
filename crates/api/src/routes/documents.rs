//! Route definitions for the document lifecycle.
//!
//! Registered under `/documents`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Document routes, registered as `/documents`.
///
/// ```text
/// GET    /                                    list_documents
/// POST   /                                    create_document
/// GET    /{slug}                              get_document
/// PUT    /{slug}                              update_document
/// DELETE /{slug}                              delete_document
/// POST   /{slug}/submit-review                submit_for_review
/// POST   /{slug}/publish                      publish_document
/// POST   /{slug}/archive                      archive_document
/// POST   /{slug}/duplicate                    duplicate_document
/// GET    /{slug}/versions                     list_versions
/// GET    /{slug}/versions/compare             compare_document_versions
/// GET    /{slug}/versions/{version}           get_version
/// DELETE /{slug}/versions/{version}           delete_version
/// POST   /{slug}/versions/{version}/verify    verify_version
/// POST   /{slug}/rollback/{version}           rollback_document
/// GET    /{slug}/export                       export_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/{slug}",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
        .route("/{slug}/submit-review", post(documents::submit_for_review))
        .route("/{slug}/publish", post(documents::publish_document))
        .route("/{slug}/archive", post(documents::archive_document))
        .route("/{slug}/duplicate", post(documents::duplicate_document))
        .route("/{slug}/versions", get(documents::list_versions))
        .route(
            "/{slug}/versions/compare",
            get(documents::compare_document_versions),
        )
        .route(
            "/{slug}/versions/{version}",
            get(documents::get_version).delete(documents::delete_version),
        )
        .route(
            "/{slug}/versions/{version}/verify",
            post(documents::verify_version),
        )
        .route(
            "/{slug}/rollback/{version}",
            post(documents::rollback_document),
        )
        .route("/{slug}/export", get(documents::export_document))
}
