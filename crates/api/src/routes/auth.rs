//! Route definitions for the `/auth` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{admin, auth};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /register     -> register
/// POST   /login        -> login
/// GET    /me           -> me (requires auth)
/// GET    /users        -> list_users (admin)
/// DELETE /users/{id}   -> delete_user (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
}
