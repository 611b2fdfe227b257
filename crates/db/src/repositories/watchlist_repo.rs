//! Repository for the `watchlist_entries` table.

use cinecritic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::watchlist::WatchlistEntry;

const COLUMNS: &str = "user_id, film_id, added_at";

/// Provides add/remove/list for a user's watchlist. Every query is scoped
/// by `user_id`.
pub struct WatchlistRepo;

impl WatchlistRepo {
    /// List a user's entries, most recently added first.
    pub async fn list_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WatchlistEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watchlist_entries
             WHERE user_id = $1
             ORDER BY added_at DESC, film_id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, WatchlistEntry>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(conn)
            .await
    }

    /// Count a user's entries.
    pub async fn count_for_user(conn: &mut PgConnection, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM watchlist_entries WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(conn)
            .await
    }

    /// Find a single entry.
    pub async fn find(
        conn: &mut PgConnection,
        user_id: DbId,
        film_id: DbId,
    ) -> Result<Option<WatchlistEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watchlist_entries WHERE user_id = $1 AND film_id = $2"
        );
        sqlx::query_as::<_, WatchlistEntry>(&query)
            .bind(user_id)
            .bind(film_id)
            .fetch_optional(conn)
            .await
    }

    /// Add a film to a user's watchlist. A duplicate pair violates the
    /// primary key.
    pub async fn add(
        conn: &mut PgConnection,
        user_id: DbId,
        film_id: DbId,
    ) -> Result<WatchlistEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO watchlist_entries (user_id, film_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WatchlistEntry>(&query)
            .bind(user_id)
            .bind(film_id)
            .fetch_one(conn)
            .await
    }

    /// Remove a film from a user's watchlist. Returns `true` if a row was removed.
    pub async fn remove(
        conn: &mut PgConnection,
        user_id: DbId,
        film_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM watchlist_entries WHERE user_id = $1 AND film_id = $2")
                .bind(user_id)
                .bind(film_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
