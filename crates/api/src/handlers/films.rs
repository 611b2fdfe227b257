//! Handlers for the `/films` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinecritic_core::catalog::{
    contains_pattern, trim_in_place, trim_optional, validate_release_year, MAX_DIRECTOR_LENGTH,
    MAX_TITLE_LENGTH,
};
use cinecritic_core::error::CoreError;
use cinecritic_core::pagination::{Page, PageRequest};
use cinecritic_core::types::DbId;
use cinecritic_db::models::film::{CreateFilm, Film, FilmFilter, UpdateFilm};
use cinecritic_db::repositories::FilmRepo;
use serde::Deserialize;
use sqlx::PgConnection;
use validator::{Validate, ValidationError, ValidationErrors};

use super::find_film;
use crate::error::AppResult;
use crate::extract::{present, AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const DUPLICATE_FILM: &str = "A film with this title and release year already exists";
const TITLE_LENGTH: &str = "Title must be 1-150 characters.";
const DIRECTOR_LENGTH: &str = "Director must be at most 100 characters.";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /films`.
#[derive(Debug, Default, Deserialize)]
pub struct FilmListParams {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Exact release year.
    pub year: Option<i32>,
    /// Case-insensitive substring of the director.
    pub director: Option<String>,
    pub genre_id: Option<DbId>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl FilmListParams {
    fn filter(&self) -> FilmFilter {
        FilmFilter {
            title_pattern: contains_pattern(self.title.as_deref()),
            release_year: self.year,
            director_pattern: contains_pattern(self.director.as_deref()),
            genre_id: self.genre_id,
        }
    }
}

/// Request body for `POST /films`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFilmRequest {
    #[validate(length(min = 1, max = 150, message = "Title must be 1-150 characters."))]
    pub title: String,
    #[validate(custom(function = "cinecritic_core::catalog::validate_release_year"))]
    pub release_year: Option<i32>,
    #[validate(length(max = 100, message = "Director must be at most 100 characters."))]
    pub director: Option<String>,
    pub description: Option<String>,
}

impl CreateFilmRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        self.director = trim_optional(self.director.take());
        self.description = trim_optional(self.description.take());
    }
}

/// Request body for `PATCH /films/{film_id}`.
///
/// Absent keys are left as is. An explicit `null` (or a blank string)
/// clears `release_year`, `director` or `description`; `title` cannot be
/// cleared.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFilmRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub release_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub director: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

impl UpdateFilmRequest {
    fn normalize(&mut self) {
        if let Some(Some(title)) = self.title.as_mut() {
            trim_in_place(title);
        }
        self.director = self.director.take().map(trim_optional);
        self.description = self.description.take().map(trim_optional);
    }
}

impl Validate for UpdateFilmRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            let len = title.as_deref().map_or(0, |t| t.chars().count() as u64);
            if !(1..=MAX_TITLE_LENGTH).contains(&len) {
                errors.add("title", length_error(TITLE_LENGTH));
            }
        }
        if let Some(Some(year)) = self.release_year {
            if let Err(err) = validate_release_year(year) {
                errors.add("release_year", err);
            }
        }
        if let Some(Some(director)) = &self.director {
            if director.chars().count() as u64 > MAX_DIRECTOR_LENGTH {
                errors.add("director", length_error(DIRECTOR_LENGTH));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn length_error(message: &'static str) -> ValidationError {
    ValidationError::new("length").with_message(message.into())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/films
pub async fn list_films(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FilmListParams>,
) -> AppResult<Json<Page<Film>>> {
    let request = PageRequest::new(params.page, params.per_page);
    let filter = params.filter();

    let mut conn = state.pool.acquire().await?;
    let total = FilmRepo::count(&mut conn, &filter).await?;
    let films = FilmRepo::list(&mut conn, &filter, request.limit(), request.offset()).await?;

    Ok(Json(Page::new(films, request, total)))
}

/// GET /api/v1/films/{film_id}
pub async fn get_film(
    State(state): State<AppState>,
    AppPath(film_id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Film>>> {
    let mut conn = state.pool.acquire().await?;
    let film = find_film(&mut conn, film_id).await?;
    Ok(Json(DataResponse { data: film }))
}

/// POST /api/v1/films
pub async fn create_film(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateFilmRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Film>>)> {
    input.normalize();
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_unique(&mut tx, &input.title, input.release_year, None).await?;

    let film = FilmRepo::create(
        &mut tx,
        &CreateFilm {
            title: input.title,
            release_year: input.release_year,
            director: input.director,
            description: input.description,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(film_id = film.id, admin_id = admin.user_id, "Film created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: film })))
}

/// PATCH /api/v1/films/{film_id}
pub async fn update_film(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(film_id): AppPath<DbId>,
    AppJson(mut input): AppJson<UpdateFilmRequest>,
) -> AppResult<Json<DataResponse<Film>>> {
    input.normalize();
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    let existing = find_film(&mut tx, film_id).await?;

    if input.title.is_some() || input.release_year.is_some() {
        let title = input
            .title
            .as_ref()
            .and_then(|t| t.as_deref())
            .unwrap_or(&existing.title);
        let release_year = input.release_year.unwrap_or(existing.release_year);
        ensure_unique(&mut tx, title, release_year, Some(film_id)).await?;
    }

    let film = FilmRepo::update(
        &mut tx,
        film_id,
        &UpdateFilm {
            title: input.title.flatten(),
            release_year: input.release_year,
            director: input.director,
            description: input.description,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Film",
        id: film_id,
    })?;
    tx.commit().await?;

    tracing::info!(film_id, admin_id = admin.user_id, "Film updated");
    Ok(Json(DataResponse { data: film }))
}

/// DELETE /api/v1/films/{film_id}
///
/// Reviews, watchlist entries and genre links are removed with the film.
pub async fn delete_film(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(film_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    if !FilmRepo::delete(&mut tx, film_id).await? {
        return Err(CoreError::NotFound {
            entity: "Film",
            id: film_id,
        }
        .into());
    }
    tx.commit().await?;

    tracing::info!(film_id, admin_id = admin.user_id, "Film deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject a (title, release_year) pair already used by another film.
/// Undated films never conflict.
async fn ensure_unique(
    conn: &mut PgConnection,
    title: &str,
    release_year: Option<i32>,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    let Some(release_year) = release_year else {
        return Ok(());
    };
    match FilmRepo::find_by_title_and_year(conn, title, release_year).await? {
        Some(other) if Some(other.id) != exclude_id => {
            Err(CoreError::Conflict(DUPLICATE_FILM.into()).into())
        }
        _ => Ok(()),
    }
}
