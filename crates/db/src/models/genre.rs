//! Genre and film-genre junction models.

use cinecritic_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
}

/// A row from the `film_genres` junction table.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct FilmGenre {
    pub film_id: DbId,
    pub genre_id: DbId,
}
