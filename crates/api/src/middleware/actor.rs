//! Actor identity extractor for Axum handlers.
//!
//! The platform gateway authenticates callers and enforces content-access
//! rules before requests reach this service; it forwards the caller's
//! identity in the `x-actor-id` header. This service records that identity
//! on audit fields and performs no authorization of its own.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use coursedesk_core::error::CoreError;
use coursedesk_core::types::ActorId;

use crate::error::AppError;

/// The attributable identity behind a mutating request.
///
/// Use this as an extractor parameter in any handler that writes:
///
/// ```ignore
/// async fn my_handler(actor: Actor) -> AppResult<Json<()>> {
///     tracing::info!(actor_id = actor.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: ActorId,
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-actor-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-actor-id header".into()))
            })?;

        let id: ActorId = header.trim().parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid x-actor-id header; expected a numeric identity".into(),
            ))
        })?;

        Ok(Actor { id })
    }
}
