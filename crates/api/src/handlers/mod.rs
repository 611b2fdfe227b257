pub mod admin;
pub mod auth;
pub mod films;
pub mod genres;
pub mod reviews;
pub mod watchlist;

use cinecritic_core::error::CoreError;
use cinecritic_core::types::DbId;
use cinecritic_db::models::film::Film;
use cinecritic_db::repositories::FilmRepo;
use sqlx::PgConnection;

use crate::error::AppResult;

/// Load a film or fail with `NotFound`.
pub(crate) async fn find_film(conn: &mut PgConnection, film_id: DbId) -> AppResult<Film> {
    FilmRepo::find_by_id(conn, film_id).await?.ok_or_else(|| {
        CoreError::NotFound {
            entity: "Film",
            id: film_id,
        }
        .into()
    })
}
