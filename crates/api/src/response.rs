//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: sports }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
