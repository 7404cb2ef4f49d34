use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gigboard_core::error::CoreError;
use serde_json::json;

/// Error returned by every handler.
///
/// Domain failures arrive as [`CoreError`], storage failures as
/// [`sqlx::Error`]. Both render as `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type ErrorParts = (StatusCode, &'static str, String);

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },
            AppError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// PostgreSQL SQLSTATE codes the schema can raise on bad input.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Map a sqlx error onto the response it should produce.
///
/// - `RowNotFound` is 404. Scoped upserts and lookups report a missing or
///   foreign row this way.
/// - `uq_*` unique violations are 409.
/// - `ck_*` check violations and foreign-key violations are 400: the
///   request carried a value the schema refuses.
/// - Anything else is a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    let sqlx::Error::Database(db_err) = err else {
        if matches!(err, sqlx::Error::RowNotFound) {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            );
        }
        tracing::error!(error = %err, "Database error");
        return internal();
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        Some(CHECK_VIOLATION) if constraint.starts_with("ck_") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value rejected by constraint: {constraint}"),
        ),
        Some(FOREIGN_KEY_VIOLATION) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Referenced row does not exist: {constraint}"),
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}
