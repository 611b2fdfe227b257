//! Page-number pagination shared by every listing.
//!
//! Callers send `?page=&per_page=`; values are clamped rather than rejected:
//! `page` floors at 1 and `per_page` is held to `1..=MAX_PER_PAGE`.

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Clamp a user-provided page number to valid bounds.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(DEFAULT_PAGE).max(1)
}

/// Clamp a user-provided page size to valid bounds.
pub fn clamp_per_page(per_page: Option<i64>) -> i64 {
    per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
}

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            per_page: clamp_per_page(per_page),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// The `meta` object of a paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            pages: (total + request.per_page - 1) / request.per_page,
        }
    }
}

/// A page of items: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total),
        }
    }
}
