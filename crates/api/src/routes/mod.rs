pub mod auth;
pub mod films;
pub mod genres;
pub mod health;
pub mod reviews;
pub mod watchlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         own profile (auth)
/// /auth/users                                      list users (admin)
/// /auth/users/{id}                                 delete user (admin)
///
/// /films                                           list (public), create (admin)
/// /films/{film_id}                                 get (public), update, delete (admin)
/// /films/{film_id}/genres                          list film genres (public)
/// /films/{film_id}/genres/{genre_id}               attach, detach (admin)
///
/// /films/{film_id}/reviews                         list (public/admin filters), create (auth)
/// /films/{film_id}/reviews/{review_id}             get, update, delete
/// /films/{film_id}/reviews/{review_id}/publish     publish (author or admin)
/// /films/{film_id}/reviews/{review_id}/flag        flag (auth)
///
/// /genres                                          list (public), create (admin)
/// /genres/{genre_id}                               delete (admin)
///
/// /users/me/watchlist                              list, add (auth)
/// /users/me/watchlist/{film_id}                    remove (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/films", films::router())
        .nest("/films/{film_id}/reviews", reviews::router())
        .nest("/genres", genres::router())
        .nest("/users/me/watchlist", watchlist::router())
}
