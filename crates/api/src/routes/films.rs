//! Route definitions for the `/films` resource and its genre links.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{films, genres};
use crate::state::AppState;

/// Routes mounted at `/films`.
///
/// ```text
/// GET    /                              -> list_films
/// POST   /                              -> create_film (admin)
/// GET    /{film_id}                     -> get_film
/// PATCH  /{film_id}                     -> update_film (admin)
/// DELETE /{film_id}                     -> delete_film (admin)
/// GET    /{film_id}/genres              -> list_film_genres
/// POST   /{film_id}/genres/{genre_id}   -> attach_genre (admin)
/// DELETE /{film_id}/genres/{genre_id}   -> detach_genre (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(films::list_films).post(films::create_film))
        .route(
            "/{film_id}",
            get(films::get_film)
                .patch(films::update_film)
                .delete(films::delete_film),
        )
        .route("/{film_id}/genres", get(genres::list_film_genres))
        .route(
            "/{film_id}/genres/{genre_id}",
            post(genres::attach_genre).delete(genres::detach_genre),
        )
}
