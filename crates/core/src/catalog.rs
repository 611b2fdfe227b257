//! Field rules for films and genres.

use chrono::Datelike;
use validator::ValidationError;

/// Maximum length of a film title.
pub const MAX_TITLE_LENGTH: u64 = 150;

/// Maximum length of a director name.
pub const MAX_DIRECTOR_LENGTH: u64 = 100;

/// Maximum length of a genre name.
pub const MAX_GENRE_NAME_LENGTH: u64 = 50;

/// The earliest plausible release year (Roundhay Garden Scene).
pub const MIN_RELEASE_YEAR: i32 = 1888;

/// The latest accepted release year: one year past the current one.
pub fn max_release_year() -> i32 {
    chrono::Utc::now().year() + 1
}

/// `validator` hook for `release_year` fields.
pub fn validate_release_year(year: i32) -> Result<(), ValidationError> {
    let max = max_release_year();
    if (MIN_RELEASE_YEAR..=max).contains(&year) {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message =
            Some(format!("Release year must be between {MIN_RELEASE_YEAR} and {max}.").into());
        Err(err)
    }
}

/// Trim a required string field in place.
pub fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trim an optional string field; blank values collapse to `None`.
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build a `%substring%` pattern for case-insensitive matching, or `None`
/// when the filter is blank.
pub fn contains_pattern(filter: Option<&str>) -> Option<String> {
    filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| format!("%{}%", escape_like(f)))
}
