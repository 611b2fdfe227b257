//! Route definitions for the caller's watchlist.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::watchlist;
use crate::state::AppState;

/// Routes mounted at `/users/me/watchlist`.
///
/// ```text
/// GET    /             -> list_watchlist
/// POST   /             -> add_to_watchlist
/// DELETE /{film_id}    -> remove_from_watchlist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(watchlist::list_watchlist).post(watchlist::add_to_watchlist),
        )
        .route("/{film_id}", delete(watchlist::remove_from_watchlist))
}
