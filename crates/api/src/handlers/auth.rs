//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinecritic_core::catalog::trim_in_place;
use cinecritic_core::error::CoreError;
use cinecritic_core::identity::{normalize_email, INVALID_CREDENTIALS};
use cinecritic_core::roles::Role;
use cinecritic_db::models::user::{CreateUser, UserPublic};
use cinecritic_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_dummy_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters."))]
    pub username: String,
    #[validate(
        email(message = "Not a valid email address."),
        length(max = 100, message = "Email must be at most 100 characters.")
    )]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters."))]
    pub password: String,
}

impl RegisterRequest {
    /// Trim the username and canonicalize the email before validation.
    fn normalize(&mut self) {
        trim_in_place(&mut self.username);
        self.email = normalize_email(&self.email);
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a `user`-role account. Returns 201 with the public profile.
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserPublic>>)> {
    input.normalize();
    input.validate()?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut tx = state.pool.begin().await?;

    if UserRepo::find_by_email(&mut tx, &input.email).await?.is_some() {
        return Err(CoreError::Conflict("Email already registered".into()).into());
    }
    if UserRepo::find_by_username(&mut tx, &input.username)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("Username already taken".into()).into());
    }

    let user = UserRepo::create(
        &mut tx,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role: Role::User,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserPublic::from(user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Exchange email + password for a Bearer access token. Unknown emails and
/// wrong passwords produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&input.email);

    let mut conn = state.pool.acquire().await?;
    let Some(user) = UserRepo::find_by_email(&mut conn, &email).await? else {
        verify_dummy_password(&input.password);
        tracing::warn!("Login rejected: unknown email");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Login rejected: wrong password");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    let role = user.role()?;
    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
    }))
}

/// GET /api/v1/auth/me
///
/// The caller's own profile. 404 if the account was deleted after the token
/// was issued.
pub async fn me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<Json<DataResponse<UserPublic>>> {
    let mut conn = state.pool.acquire().await?;
    let user = UserRepo::find_by_id(&mut conn, principal.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: principal.user_id,
        })?;

    Ok(Json(DataResponse {
        data: UserPublic::from(user),
    }))
}
