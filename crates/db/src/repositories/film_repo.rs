//! Repository for the `films` table.

use cinecritic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::film::{CreateFilm, Film, FilmFilter, UpdateFilm};

/// Column list for the `films` table.
const COLUMNS: &str = "id, title, release_year, director, description";

/// Shared WHERE clause for listing and counting. Parameters:
/// `$1` title pattern, `$2` release year, `$3` director pattern, `$4` genre id.
const FILTER_CLAUSE: &str = "($1::TEXT IS NULL OR f.title ILIKE $1)
       AND ($2::INTEGER IS NULL OR f.release_year = $2)
       AND ($3::TEXT IS NULL OR f.director ILIKE $3)
       AND ($4::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM film_genres fg
            WHERE fg.film_id = f.id AND fg.genre_id = $4))";

/// Provides CRUD and filtered listing for films.
pub struct FilmRepo;

impl FilmRepo {
    /// Insert a new film, returning the created row.
    pub async fn create(conn: &mut PgConnection, input: &CreateFilm) -> Result<Film, sqlx::Error> {
        let query = format!(
            "INSERT INTO films (title, release_year, director, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(&input.title)
            .bind(input.release_year)
            .bind(&input.director)
            .bind(&input.description)
            .fetch_one(conn)
            .await
    }

    /// Find a film by its internal ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Film>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM films WHERE id = $1");
        sqlx::query_as::<_, Film>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a film by its (title, release_year) natural key.
    ///
    /// Undated films have no natural key, so there is no `None` variant.
    pub async fn find_by_title_and_year(
        conn: &mut PgConnection,
        title: &str,
        release_year: i32,
    ) -> Result<Option<Film>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM films
             WHERE title = $1 AND release_year = $2"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(title)
            .bind(release_year)
            .fetch_optional(conn)
            .await
    }

    /// List films matching `filter`, ordered by title then id.
    pub async fn list(
        conn: &mut PgConnection,
        filter: &FilmFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Film>, sqlx::Error> {
        let query = format!(
            "SELECT f.id, f.title, f.release_year, f.director, f.description
             FROM films f
             WHERE {FILTER_CLAUSE}
             ORDER BY f.title ASC, f.id ASC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(&filter.title_pattern)
            .bind(filter.release_year)
            .bind(&filter.director_pattern)
            .bind(filter.genre_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(conn)
            .await
    }

    /// Count films matching `filter`.
    pub async fn count(conn: &mut PgConnection, filter: &FilmFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM films f WHERE {FILTER_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(&filter.title_pattern)
            .bind(filter.release_year)
            .bind(&filter.director_pattern)
            .bind(filter.genre_id)
            .fetch_one(conn)
            .await
    }

    /// Update a film. Only non-`None` fields in `input` are applied.
    ///
    /// The nullable columns carry a presence flag so `Some(None)` writes
    /// NULL. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateFilm,
    ) -> Result<Option<Film>, sqlx::Error> {
        let query = format!(
            "UPDATE films SET
                title = COALESCE($2, title),
                release_year = CASE WHEN $3 THEN $4 ELSE release_year END,
                director = CASE WHEN $5 THEN $6 ELSE director END,
                description = CASE WHEN $7 THEN $8 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.release_year.is_some())
            .bind(input.release_year.flatten())
            .bind(input.director.is_some())
            .bind(input.director.as_ref().and_then(|v| v.as_deref()))
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(conn)
            .await
    }

    /// Delete a film. Reviews, watchlist entries and genre links cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM films WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
