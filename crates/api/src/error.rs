use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use echoarty_core::error::CoreError;

use crate::response::ErrorBody;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as the `{success: false, message, error}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request: unreadable body, path or query string.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const GENERIC_INTERNAL: &str = "An internal error occurred";

type ErrorParts = (StatusCode, &'static str, String);

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        GENERIC_INTERNAL.to_string(),
    )
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, axum::Json(ErrorBody::new(message, code))).into_response()
    }
}

/// Map a sqlx error onto the envelope.
///
/// `RowNotFound` is a 404 and an out-of-range numeric is a 400. Unique
/// violations on `uq_*` constraints and foreign-key violations are 409s.
/// Everything else is a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return internal();
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        Some("23505") => {
            if let Some(message) = unique_violation_message(constraint) {
                return (StatusCode::CONFLICT, "CONFLICT", message);
            }
        }
        // numeric_value_out_of_range: a computed total beyond NUMERIC(12, 2).
        Some("22003") => {
            tracing::warn!(error = %db_err, "Numeric value out of range");
            return (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Amount is out of range".to_string(),
            );
        }
        Some("23503") => {
            tracing::warn!(constraint, "Foreign key violation");
            return (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Resource is referenced by other records".to_string(),
            );
        }
        _ => {}
    }
    tracing::error!(error = %db_err, "Database error");
    internal()
}

fn unique_violation_message(constraint: &str) -> Option<String> {
    let message = match constraint {
        "uq_users_username" => "Username already exists".to_string(),
        "uq_users_email" => "Email already exists".to_string(),
        "uq_categories_name" => "Category already exists".to_string(),
        other if other.starts_with("uq_") => {
            format!("Duplicate value violates unique constraint: {other}")
        }
        _ => return None,
    };
    Some(message)
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
