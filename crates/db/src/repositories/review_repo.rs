//! Repository for the `reviews` table.

use cinecritic_core::review::ReviewStatus;
use cinecritic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::review::{CreateReview, Review, UpdateReview};

/// Column list for the `reviews` table.
const COLUMNS: &str = "id, rating, body, status, film_id, user_id, \
    created_at, updated_at, published_at, flagged_at";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// List a film's reviews, newest first. `status = None` matches every status.
    pub async fn list_for_film(
        conn: &mut PgConnection,
        film_id: DbId,
        status: Option<ReviewStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews
             WHERE film_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(film_id)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(conn)
            .await
    }

    /// Count a film's reviews with the same status filter as [`Self::list_for_film`].
    pub async fn count_for_film(
        conn: &mut PgConnection,
        film_id: DbId,
        status: Option<ReviewStatus>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reviews
             WHERE film_id = $1
               AND ($2::TEXT IS NULL OR status = $2)",
        )
        .bind(film_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_one(conn)
        .await
    }

    /// Insert a new review, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateReview,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews
                (film_id, user_id, rating, body, status, published_at, flagged_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.film_id)
            .bind(input.user_id)
            .bind(input.rating)
            .bind(&input.body)
            .bind(input.lifecycle.status.as_str())
            .bind(input.lifecycle.published_at)
            .bind(input.lifecycle.flagged_at)
            .fetch_one(conn)
            .await
    }

    /// Find a review by its ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a review by ID, locking the row for the rest of the transaction.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find the review a user wrote for a film, if any.
    pub async fn find_for_film_and_user(
        conn: &mut PgConnection,
        film_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE film_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(film_id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Write the mutable columns of a review. `updated_at` is stamped by the
    /// `set_reviews_updated_at` trigger.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET
                rating = $2,
                body = $3,
                status = $4,
                published_at = $5,
                flagged_at = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(input.rating)
            .bind(&input.body)
            .bind(input.lifecycle.status.as_str())
            .bind(input.lifecycle.published_at)
            .bind(input.lifecycle.flagged_at)
            .fetch_one(conn)
            .await
    }

    /// Delete a review by its ID. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
