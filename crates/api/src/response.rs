//! Response envelope shared by all handlers.

use serde::Serialize;

/// Standard `{ "data": T }` envelope around successful responses.
///
/// Keeps the wire shape uniform so clients unwrap every success payload the
/// same way, and keeps handlers off ad-hoc `serde_json::json!` maps.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
