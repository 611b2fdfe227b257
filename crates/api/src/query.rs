//! Shared query parameter types for API handlers.

use cinecritic_core::pagination::PageRequest;
use serde::Deserialize;

/// Page-number pagination parameters (`?page=&per_page=`).
///
/// Values are clamped, not rejected; non-integers are rejected by the
/// query extractor.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}
