//! Route definitions for the `/genres` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::genres;
use crate::state::AppState;

/// Routes mounted at `/genres`.
///
/// ```text
/// GET    /              -> list_genres
/// POST   /              -> create_genre (admin)
/// DELETE /{genre_id}    -> delete_genre (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(genres::list_genres).post(genres::create_genre))
        .route("/{genre_id}", delete(genres::delete_genre))
}
