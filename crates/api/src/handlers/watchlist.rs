//! Handlers for the caller's own watchlist (`/users/me/watchlist`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinecritic_core::error::CoreError;
use cinecritic_core::pagination::Page;
use cinecritic_core::types::DbId;
use cinecritic_db::models::watchlist::WatchlistEntry;
use cinecritic_db::repositories::WatchlistRepo;
use serde::Deserialize;
use validator::Validate;

use super::find_film;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users/me/watchlist`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddToWatchlistRequest {
    #[validate(range(min = 1, message = "film_id must be a positive integer."))]
    pub film_id: DbId,
}

/// GET /api/v1/users/me/watchlist
pub async fn list_watchlist(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<Json<Page<WatchlistEntry>>> {
    let request = params.page_request();
    let mut conn = state.pool.acquire().await?;

    let total = WatchlistRepo::count_for_user(&mut conn, principal.user_id).await?;
    let entries = WatchlistRepo::list_for_user(
        &mut conn,
        principal.user_id,
        request.limit(),
        request.offset(),
    )
    .await?;

    Ok(Json(Page::new(entries, request, total)))
}

/// POST /api/v1/users/me/watchlist
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppJson(input): AppJson<AddToWatchlistRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<WatchlistEntry>>)> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    find_film(&mut tx, input.film_id).await?;
    if WatchlistRepo::find(&mut tx, principal.user_id, input.film_id)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("Film is already on your watchlist".into()).into());
    }

    let entry = WatchlistRepo::add(&mut tx, principal.user_id, input.film_id).await?;
    tx.commit().await?;

    tracing::info!(user_id = principal.user_id, film_id = input.film_id, "Added to watchlist");
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// DELETE /api/v1/users/me/watchlist/{film_id}
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(film_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    if !WatchlistRepo::remove(&mut tx, principal.user_id, film_id).await? {
        return Err(
            CoreError::Missing(format!("Film {film_id} is not on your watchlist")).into(),
        );
    }
    tx.commit().await?;

    tracing::info!(user_id = principal.user_id, film_id, "Removed from watchlist");
    Ok(StatusCode::NO_CONTENT)
}
