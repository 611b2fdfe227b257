//! Handlers for `/genres` and the `/films/{film_id}/genres` association.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinecritic_core::catalog::trim_in_place;
use cinecritic_core::error::CoreError;
use cinecritic_core::types::DbId;
use cinecritic_db::models::genre::Genre;
use cinecritic_db::repositories::GenreRepo;
use serde::Deserialize;
use validator::Validate;

use super::find_film;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /genres`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGenreRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters."))]
    pub name: String,
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

/// GET /api/v1/genres
pub async fn list_genres(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Genre>>>> {
    let mut conn = state.pool.acquire().await?;
    let genres = GenreRepo::list(&mut conn).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// POST /api/v1/genres
pub async fn create_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateGenreRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Genre>>)> {
    trim_in_place(&mut input.name);
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    if GenreRepo::find_by_name(&mut tx, &input.name).await?.is_some() {
        return Err(CoreError::Conflict("Genre already exists".into()).into());
    }
    let genre = GenreRepo::create(&mut tx, &input.name).await?;
    tx.commit().await?;

    tracing::info!(genre_id = genre.id, name = %genre.name, admin_id = admin.user_id, "Genre created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}

/// DELETE /api/v1/genres/{genre_id}
pub async fn delete_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(genre_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    if !GenreRepo::delete(&mut tx, genre_id).await? {
        return Err(CoreError::NotFound {
            entity: "Genre",
            id: genre_id,
        }
        .into());
    }
    tx.commit().await?;

    tracing::info!(genre_id, admin_id = admin.user_id, "Genre deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Film <-> genre links
// ---------------------------------------------------------------------------

/// GET /api/v1/films/{film_id}/genres
pub async fn list_film_genres(
    State(state): State<AppState>,
    AppPath(film_id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<Genre>>>> {
    let mut conn = state.pool.acquire().await?;
    find_film(&mut conn, film_id).await?;
    let genres = GenreRepo::list_for_film(&mut conn, film_id).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// POST /api/v1/films/{film_id}/genres/{genre_id}
pub async fn attach_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath((film_id, genre_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    find_film(&mut tx, film_id).await?;
    GenreRepo::find_by_id(&mut tx, genre_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Genre",
            id: genre_id,
        })?;
    if GenreRepo::find_link(&mut tx, film_id, genre_id)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("Genre already attached to this film".into()).into());
    }

    GenreRepo::attach(&mut tx, film_id, genre_id).await?;
    tx.commit().await?;

    tracing::info!(film_id, genre_id, admin_id = admin.user_id, "Genre attached");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/films/{film_id}/genres/{genre_id}
pub async fn detach_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath((film_id, genre_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    if !GenreRepo::detach(&mut tx, film_id, genre_id).await? {
        return Err(CoreError::Missing(format!(
            "Genre {genre_id} is not attached to film {film_id}"
        ))
        .into());
    }
    tx.commit().await?;

    tracing::info!(film_id, genre_id, admin_id = admin.user_id, "Genre detached");
    Ok(StatusCode::NO_CONTENT)
}
