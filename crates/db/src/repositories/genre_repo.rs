//! Repository for the `genres` and `film_genres` tables.

use cinecritic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::genre::{FilmGenre, Genre};

/// Column list for the `genres` table.
const COLUMNS: &str = "id, name";

/// Provides CRUD operations for genres and their film associations.
pub struct GenreRepo;

impl GenreRepo {
    /// List all genres ordered by name.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Genre>(&query).fetch_all(conn).await
    }

    /// Insert a new genre, returning the created row.
    pub async fn create(conn: &mut PgConnection, name: &str) -> Result<Genre, sqlx::Error> {
        let query = format!("INSERT INTO genres (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(name)
            .fetch_one(conn)
            .await
    }

    /// Find a genre by its internal ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE id = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a genre by exact name.
    pub async fn find_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE name = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    /// Delete a genre. Film links cascade. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get all genres attached to a film, ordered by name.
    pub async fn list_for_film(
        conn: &mut PgConnection,
        film_id: DbId,
    ) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "SELECT g.id, g.name
             FROM genres g
             INNER JOIN film_genres fg ON fg.genre_id = g.id
             WHERE fg.film_id = $1
             ORDER BY g.name ASC, g.id ASC",
        )
        .bind(film_id)
        .fetch_all(conn)
        .await
    }

    /// Find a single film-genre link.
    pub async fn find_link(
        conn: &mut PgConnection,
        film_id: DbId,
        genre_id: DbId,
    ) -> Result<Option<FilmGenre>, sqlx::Error> {
        sqlx::query_as::<_, FilmGenre>(
            "SELECT film_id, genre_id FROM film_genres
             WHERE film_id = $1 AND genre_id = $2",
        )
        .bind(film_id)
        .bind(genre_id)
        .fetch_optional(conn)
        .await
    }

    /// Link a genre to a film. A duplicate pair violates the primary key.
    pub async fn attach(
        conn: &mut PgConnection,
        film_id: DbId,
        genre_id: DbId,
    ) -> Result<FilmGenre, sqlx::Error> {
        sqlx::query_as::<_, FilmGenre>(
            "INSERT INTO film_genres (film_id, genre_id)
             VALUES ($1, $2)
             RETURNING film_id, genre_id",
        )
        .bind(film_id)
        .bind(genre_id)
        .fetch_one(conn)
        .await
    }

    /// Remove a film-genre link. Returns `true` if a row was removed.
    pub async fn detach(
        conn: &mut PgConnection,
        film_id: DbId,
        genre_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM film_genres WHERE film_id = $1 AND genre_id = $2")
            .bind(film_id)
            .bind(genre_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
