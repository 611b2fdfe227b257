//! Request extractors whose rejections render as [`AppError`].
//!
//! Axum's stock `Json`, `Query` and `Path` reject with plain-text bodies.
//! These wrappers route the rejection through `AppError` so malformed input
//! gets the same `{ "error": "bad_request", ... }` body as every other error.

use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `deserialize_with` hook for PATCH fields typed `Option<Option<T>>`.
///
/// Paired with `#[serde(default)]`, an absent key stays `None` while a
/// present key becomes `Some`, so an explicit `null` arrives as `Some(None)`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "present")]
        director: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.director, None);

        let null: Patch = serde_json::from_str(r#"{"director":null}"#).unwrap();
        assert_eq!(null.director, Some(None));

        let value: Patch = serde_json::from_str(r#"{"director":"Nolan"}"#).unwrap();
        assert_eq!(value.director, Some(Some("Nolan".into())));
    }
}
