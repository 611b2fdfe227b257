//! Handlers for `/films/{film_id}/reviews`.
//!
//! Every mutation loads the review with a row lock, checks ownership through
//! `cinecritic_core::policy`, computes the next [`Lifecycle`] and writes the
//! result inside one transaction.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use cinecritic_core::error::CoreError;
use cinecritic_core::pagination::{Page, PageRequest};
use cinecritic_core::policy::{require_admin, require_moderator, Principal};
use cinecritic_core::review::{normalize_body, Lifecycle, ReviewStatus, StatusFilter};
use cinecritic_core::types::DbId;
use cinecritic_db::models::review::{CreateReview, Review, UpdateReview};
use cinecritic_db::repositories::ReviewRepo;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgConnection;
use validator::Validate;

use super::find_film;
use crate::error::{AppError, AppResult};
use crate::extract::{present, AppJson, AppPath, AppQuery};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /films/{film_id}/reviews`.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewListParams {
    /// `published` (default), `draft`, `flagged` or `all`.
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Request body for `POST /films/{film_id}/reviews`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(custom(function = "cinecritic_core::review::validate_rating"))]
    pub rating: f64,
    #[validate(length(max = 5000, message = "Body must be at most 5000 characters."))]
    pub body: Option<String>,
    /// Initial status; defaults to `draft`.
    pub status: Option<String>,
}

/// Request body for `PATCH /films/{film_id}/reviews/{review_id}`.
///
/// `body: null` or `""` clears the body; an absent `body` keeps it.
/// `film_id` and `user_id` are captured only so they can be refused: any
/// occurrence of the key, `null` included, is `Some`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(custom(function = "cinecritic_core::review::validate_rating"))]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 5000, message = "Body must be at most 5000 characters."))]
    pub body: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub film_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub user_id: Option<Value>,
}

fn parse_status(raw: Option<&str>) -> Result<Option<ReviewStatus>, CoreError> {
    raw.map(ReviewStatus::from_str).transpose()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/films/{film_id}/reviews
///
/// Anyone may list published reviews; every other filter requires an admin.
pub async fn list_reviews(
    State(state): State<AppState>,
    OptionalAuthUser(principal): OptionalAuthUser,
    AppPath(film_id): AppPath<DbId>,
    AppQuery(params): AppQuery<ReviewListParams>,
) -> AppResult<Json<Page<Review>>> {
    let filter = match params.status.as_deref() {
        None => StatusFilter::default(),
        Some(raw) => StatusFilter::from_str(raw)?,
    };
    if filter.requires_admin() {
        let principal = principal.ok_or_else(|| {
            CoreError::Unauthorized("Authentication required for this status filter".into())
        })?;
        require_admin(&principal)?;
    }

    let request = PageRequest::new(params.page, params.per_page);
    let mut conn = state.pool.acquire().await?;
    find_film(&mut conn, film_id).await?;

    let status = filter.status();
    let total = ReviewRepo::count_for_film(&mut conn, film_id, status).await?;
    let reviews = ReviewRepo::list_for_film(
        &mut conn,
        film_id,
        status,
        request.limit(),
        request.offset(),
    )
    .await?;

    Ok(Json(Page::new(reviews, request, total)))
}

/// POST /api/v1/films/{film_id}/reviews
pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(film_id): AppPath<DbId>,
    AppJson(mut input): AppJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    input.body = normalize_body(input.body.take());
    input.validate()?;

    let status = parse_status(input.status.as_deref())?.unwrap_or_default();
    let lifecycle = Lifecycle::initial(status, input.body.as_deref(), Utc::now())?;

    let mut tx = state.pool.begin().await?;
    find_film(&mut tx, film_id).await?;
    if ReviewRepo::find_for_film_and_user(&mut tx, film_id, principal.user_id)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("You have already reviewed this film".into()).into());
    }

    let review = ReviewRepo::create(
        &mut tx,
        &CreateReview {
            film_id,
            user_id: principal.user_id,
            rating: input.rating,
            body: input.body,
            lifecycle,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        review_id = review.id,
        film_id,
        user_id = principal.user_id,
        status = %lifecycle.status,
        "Review created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/films/{film_id}/reviews/{review_id}
///
/// Published reviews are public; drafts and flagged reviews are visible to
/// their author and to admins only.
pub async fn get_review(
    State(state): State<AppState>,
    OptionalAuthUser(principal): OptionalAuthUser,
    AppPath((film_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Review>>> {
    let mut conn = state.pool.acquire().await?;
    find_film(&mut conn, film_id).await?;
    let review = find_review(&mut conn, film_id, review_id, false).await?;

    if !review.is_published() {
        let principal = principal.ok_or_else(|| {
            CoreError::Unauthorized("Authentication required to view this review".into())
        })?;
        require_moderator(&principal, review.user_id, "view an unpublished review")?;
    }

    Ok(Json(DataResponse { data: review }))
}

/// PATCH /api/v1/films/{film_id}/reviews/{review_id}
pub async fn update_review(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath((film_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(mut input): AppJson<UpdateReviewRequest>,
) -> AppResult<Json<DataResponse<Review>>> {
    if input.film_id.is_some() || input.user_id.is_some() {
        return Err(AppError::BadRequest(
            "film_id and user_id cannot be changed".into(),
        ));
    }
    if let Some(Some(body)) = input.body.as_mut() {
        *body = body.trim().to_string();
    }
    input.validate()?;
    let target = parse_status(input.status.as_deref())?;

    let mut tx = state.pool.begin().await?;
    find_film(&mut tx, film_id).await?;
    let review = find_review(&mut tx, film_id, review_id, true).await?;
    require_moderator(&principal, review.user_id, "edit this review")?;

    let body = match input.body {
        Some(body) => normalize_body(body),
        None => review.body.clone(),
    };
    let rating = input.rating.unwrap_or(review.rating);

    let updated = apply(&mut tx, &review, target, rating, body).await?;
    tx.commit().await?;

    tracing::info!(
        review_id,
        film_id,
        user_id = principal.user_id,
        status = %updated.status,
        "Review updated"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/films/{film_id}/reviews/{review_id}
pub async fn delete_review(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath((film_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    find_film(&mut tx, film_id).await?;
    let review = find_review(&mut tx, film_id, review_id, true).await?;
    require_moderator(&principal, review.user_id, "delete this review")?;

    ReviewRepo::delete(&mut tx, review_id).await?;
    tx.commit().await?;

    tracing::info!(review_id, film_id, user_id = principal.user_id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/films/{film_id}/reviews/{review_id}/publish
///
/// Author or admin only. Requires the stored body to be non-empty.
pub async fn publish_review(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath((film_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Review>>> {
    set_status(
        &state,
        principal,
        film_id,
        review_id,
        ReviewStatus::Published,
        Some("publish this review"),
    )
    .await
}

/// POST /api/v1/films/{film_id}/reviews/{review_id}/flag
///
/// Any authenticated user may flag a review.
pub async fn flag_review(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath((film_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Review>>> {
    set_status(
        &state,
        principal,
        film_id,
        review_id,
        ReviewStatus::Flagged,
        None,
    )
    .await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a review that belongs to `film_id`, optionally locking the row.
async fn find_review(
    conn: &mut PgConnection,
    film_id: DbId,
    review_id: DbId,
    for_update: bool,
) -> AppResult<Review> {
    let review = if for_update {
        ReviewRepo::find_by_id_for_update(conn, review_id).await?
    } else {
        ReviewRepo::find_by_id(conn, review_id).await?
    };

    review
        .filter(|r| r.film_id == film_id)
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Review",
                id: review_id,
            }
            .into()
        })
}

/// Status-only transition. `moderator_action` names the action when only the
/// author or an admin may perform it.
async fn set_status(
    state: &AppState,
    principal: Principal,
    film_id: DbId,
    review_id: DbId,
    target: ReviewStatus,
    moderator_action: Option<&str>,
) -> AppResult<Json<DataResponse<Review>>> {
    let mut tx = state.pool.begin().await?;
    find_film(&mut tx, film_id).await?;
    let review = find_review(&mut tx, film_id, review_id, true).await?;
    if let Some(action) = moderator_action {
        require_moderator(&principal, review.user_id, action)?;
    }

    let updated = apply(&mut tx, &review, Some(target), review.rating, review.body.clone()).await?;
    tx.commit().await?;

    tracing::info!(
        review_id,
        film_id,
        user_id = principal.user_id,
        status = %target,
        "Review status changed"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// Run the state machine against the post-patch body and persist the result.
/// A `None` target keeps the current status, which still re-checks that a
/// published review keeps a body.
async fn apply(
    conn: &mut PgConnection,
    review: &Review,
    target: Option<ReviewStatus>,
    rating: f64,
    body: Option<String>,
) -> AppResult<Review> {
    let current = review.lifecycle()?;
    let target = target.unwrap_or(current.status);
    let lifecycle = current.transition(target, body.as_deref(), Utc::now())?;

    let updated = ReviewRepo::update(
        conn,
        review.id,
        &UpdateReview {
            rating,
            body,
            lifecycle,
        },
    )
    .await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn off_step_rating_fails_validation() {
        let input = CreateReviewRequest {
            rating: 4.2,
            body: None,
            status: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("rating"));
    }

    #[test]
    fn oversized_body_fails_validation() {
        let input = CreateReviewRequest {
            rating: 4.0,
            body: Some("x".repeat(5001)),
            status: None,
        };
        assert!(input.validate().is_err());

        let at_limit = CreateReviewRequest {
            body: Some("x".repeat(5000)),
            ..input
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn patch_without_rating_passes_validation() {
        let patch = UpdateReviewRequest {
            status: Some("published".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn patch_tells_null_apart_from_absent() {
        let absent: UpdateReviewRequest = serde_json::from_str(r#"{"rating":4.5}"#).unwrap();
        assert_eq!(absent.body, None);
        assert!(absent.film_id.is_none());
        assert!(absent.user_id.is_none());

        let nulls: UpdateReviewRequest =
            serde_json::from_str(r#"{"body":null,"film_id":null,"user_id":null}"#).unwrap();
        assert_eq!(nulls.body, Some(None));
        assert_eq!(nulls.film_id, Some(Value::Null));
        assert_eq!(nulls.user_id, Some(Value::Null));
    }

    #[test]
    fn oversized_patch_body_fails_validation() {
        let patch = UpdateReviewRequest {
            body: Some(Some("x".repeat(5001))),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("body"));
    }

    #[test]
    fn status_parsing() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("flagged")).unwrap(),
            Some(ReviewStatus::Flagged)
        );
        assert_matches!(
            parse_status(Some("archived")),
            Err(CoreError::InvalidField { field: "status", .. })
        );
    }
}
