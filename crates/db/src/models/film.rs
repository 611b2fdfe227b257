//! Film entity model and DTOs.

use cinecritic_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `films` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Film {
    pub id: DbId,
    pub title: String,
    pub release_year: Option<i32>,
    pub director: Option<String>,
    pub description: Option<String>,
}

/// DTO for inserting a film. Fields are already trimmed and validated.
#[derive(Debug, Clone)]
pub struct CreateFilm {
    pub title: String,
    pub release_year: Option<i32>,
    pub director: Option<String>,
    pub description: Option<String>,
}

/// DTO for patching a film. `None` leaves the column unchanged; for the
/// nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateFilm {
    pub title: Option<String>,
    pub release_year: Option<Option<i32>>,
    pub director: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

/// Filters for the film listing. Pattern fields hold ready-made `ILIKE`
/// patterns (see `cinecritic_core::catalog::contains_pattern`).
#[derive(Debug, Clone, Default)]
pub struct FilmFilter {
    pub title_pattern: Option<String>,
    pub release_year: Option<i32>,
    pub director_pattern: Option<String>,
    pub genre_id: Option<DbId>,
}
