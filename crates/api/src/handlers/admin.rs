//! Admin-only user management handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinecritic_core::error::CoreError;
use cinecritic_core::types::DbId;
use cinecritic_db::models::user::UserPublic;
use cinecritic_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::extract::AppPath;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/auth/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserPublic>>>> {
    let mut conn = state.pool.acquire().await?;
    let users = UserRepo::list(&mut conn).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserPublic::from).collect(),
    }))
}

/// DELETE /api/v1/auth/users/{id}
///
/// Removes the account together with its reviews and watchlist entries.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(user_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    if !UserRepo::delete(&mut tx, user_id).await? {
        return Err(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }
        .into());
    }
    tx.commit().await?;

    tracing::info!(user_id, admin_id = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
