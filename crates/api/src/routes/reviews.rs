//! Route definitions for reviews, mounted at `/films/{film_id}/reviews`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// ```text
/// GET    /                        -> list_reviews
/// POST   /                        -> create_review (auth)
/// GET    /{review_id}             -> get_review
/// PATCH  /{review_id}             -> update_review (author or admin)
/// DELETE /{review_id}             -> delete_review (author or admin)
/// POST   /{review_id}/publish     -> publish_review (author or admin)
/// POST   /{review_id}/flag        -> flag_review (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::list_reviews).post(reviews::create_review))
        .route(
            "/{review_id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/{review_id}/publish", post(reviews::publish_review))
        .route("/{review_id}/flag", post(reviews::flag_review))
}
