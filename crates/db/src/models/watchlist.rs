//! Watchlist entry model.

use cinecritic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `watchlist_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WatchlistEntry {
    pub user_id: DbId,
    pub film_id: DbId,
    pub added_at: Timestamp,
}
