//! Shared response envelope types for API handlers.
//!
//! Single resources use a `{ "data": ... }` envelope; listings use
//! [`cinecritic_core::pagination::Page`], which adds `meta`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: film }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
