//! Review entity model and DTOs.

use cinecritic_core::error::CoreError;
use cinecritic_core::review::{Lifecycle, ReviewStatus};
use cinecritic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub rating: f64,
    pub body: Option<String>,
    pub status: String,
    pub film_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
    pub flagged_at: Option<Timestamp>,
}

impl Review {
    /// Current position in the status state machine.
    pub fn lifecycle(&self) -> Result<Lifecycle, CoreError> {
        let status = ReviewStatus::from_str(&self.status)
            .map_err(|_| CoreError::Internal(format!("Unknown stored status '{}'", self.status)))?;
        Ok(Lifecycle {
            status,
            published_at: self.published_at,
            flagged_at: self.flagged_at,
        })
    }

    pub fn is_published(&self) -> bool {
        self.status == ReviewStatus::Published.as_str()
    }
}

/// DTO for inserting a review. `film_id` comes from the route and `user_id`
/// from the authenticated principal.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub film_id: DbId,
    pub user_id: DbId,
    pub rating: f64,
    pub body: Option<String>,
    pub lifecycle: Lifecycle,
}

/// The full set of mutable columns after a patch has been applied.
#[derive(Debug, Clone)]
pub struct UpdateReview {
    pub rating: f64,
    pub body: Option<String>,
    pub lifecycle: Lifecycle,
}
