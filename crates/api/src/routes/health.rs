//! Service health endpoint, mounted at the root (not under `/api/v1`).

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

/// GET /health
///
/// Reports liveness plus database reachability. A broken database yields
/// `degraded` with a 200 so load balancers can tell a slow dependency from
/// a dead process.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_ok = coursedesk_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if db_ok { "reachable" } else { "unreachable" },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
