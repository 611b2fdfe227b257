use std::borrow::Cow;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinecritic_core::error::CoreError;
use serde_json::{json, Map, Value};
use sqlx::postgres::PgDatabaseError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the uniform
/// `{ "error": code, "detail": message, "meta"?: {...} }` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cinecritic_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field-level input validation failures from `validator`.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message (never sent to clients).
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Machine-readable error codes, one per status class.
pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const UNAUTHORISED: &str = "unauthorised";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const CONFLICT: &str = "conflict";
    pub const SERVER_ERROR: &str = "server_error";
}

const GENERIC_SERVER_ERROR: &str = "An unexpected error occurred.";

/// A fully classified error, ready to render.
struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    detail: String,
    meta: Option<Value>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
            meta: None,
        }
    }

    fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    fn server_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::SERVER_ERROR,
            GENERIC_SERVER_ERROR,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Validation(errors) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, "Validation failed.")
                    .with_meta(validation_meta(errors))
            }
            AppError::BadRequest(msg) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorBody::server_error()
            }
        };

        let mut payload = json!({
            "error": body.code,
            "detail": body.detail,
        });
        if let Some(meta) = body.meta {
            payload["meta"] = meta;
        }

        (body.status, axum::Json(payload)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> ErrorBody {
    match err {
        CoreError::NotFound { entity, id } => ErrorBody::new(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Missing(msg) => {
            ErrorBody::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, msg.clone())
        }
        CoreError::Validation(msg) => {
            ErrorBody::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, msg.clone())
        }
        CoreError::InvalidField { field, message } => {
            let mut meta = Map::new();
            meta.insert((*field).to_string(), json!([message]));
            ErrorBody::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message.clone())
                .with_meta(Value::Object(meta))
        }
        CoreError::Conflict(msg) => {
            ErrorBody::new(StatusCode::CONFLICT, codes::CONFLICT, msg.clone())
        }
        CoreError::Unauthorized(msg) => {
            ErrorBody::new(StatusCode::UNAUTHORIZED, codes::UNAUTHORISED, msg.clone())
        }
        CoreError::Forbidden(msg) => {
            ErrorBody::new(StatusCode::FORBIDDEN, codes::FORBIDDEN, msg.clone())
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            ErrorBody::server_error()
        }
    }
}

/// Translate a sqlx error by PostgreSQL SQLSTATE.
///
/// - `23505` unique, `23503` foreign key, `23502` not-null and `23514` check
///   violations map to 409.
/// - Class `22` data exceptions map to 400.
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorBody {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorBody::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, "Resource not found.")
        }
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().unwrap_or(Cow::Borrowed(""));
            match code.as_ref() {
                "23505" => {
                    ErrorBody::new(StatusCode::CONFLICT, codes::CONFLICT, "Duplicate entry.")
                }
                "23503" => ErrorBody::new(
                    StatusCode::CONFLICT,
                    codes::CONFLICT,
                    "Invalid reference. Check that related IDs exist.",
                ),
                "23502" => {
                    let column = db_err
                        .try_downcast_ref::<PgDatabaseError>()
                        .and_then(|pg| pg.column())
                        .unwrap_or("unknown");
                    ErrorBody::new(
                        StatusCode::CONFLICT,
                        codes::CONFLICT,
                        format!("Missing required field: {column}."),
                    )
                }
                "23514" => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    ErrorBody::new(
                        StatusCode::CONFLICT,
                        codes::CONFLICT,
                        format!("Check constraint violated: {constraint}."),
                    )
                }
                c if c.starts_with("22") => ErrorBody::new(
                    StatusCode::BAD_REQUEST,
                    codes::BAD_REQUEST,
                    "Invalid data input.",
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    ErrorBody::server_error()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorBody::server_error()
        }
    }
}

/// Render `validator` errors as `{ field: [message, ...] }`.
fn validation_meta(errors: &validator::ValidationErrors) -> Value {
    let mut meta = Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<Value> = field_errors
            .iter()
            .map(|e| {
                let text = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                Value::String(text)
            })
            .collect();
        meta.insert(field.to_string(), Value::Array(messages));
    }
    Value::Object(meta)
}

/* --------------------------------------------------------------------------
Extractor rejections
-------------------------------------------------------------------------- */

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}
