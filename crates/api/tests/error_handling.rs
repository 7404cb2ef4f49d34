//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values. The constraint
//! cases provoke real PostgreSQL errors so the SQLSTATE and constraint names
//! come from the schema itself.

use axum::response::IntoResponse;
use gigboard_api::error::AppError;
use gigboard_core::error::CoreError;
use http_body_util::BodyExt;
use sqlx::PgPool;
use uuid::Uuid;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = Uuid::nil();
    let err = AppError::Core(CoreError::NotFound { entity: "Event", id });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(
        json["error"],
        "Event with id 00000000-0000-0000-0000-000000000000 not found"
    );
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("no bands to schedule".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "no bands to schedule");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Conflict maps to 409 with CONFLICT code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("already assigned".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "already assigned");
}

// ---------------------------------------------------------------------------
// Test: sqlx RowNotFound maps to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: other sqlx errors map to 500 and sanitize
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pool_error_returns_500_and_sanitizes() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::PoolTimedOut)).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Internal maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn core_internal_error_returns_500_and_sanitizes() {
    let err = AppError::Core(CoreError::Internal("stored slot type 'secret' unknown".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(!json.to_string().contains("secret"));
}

// ---------------------------------------------------------------------------
// Test: schema constraint violations map to 400 / 409
// ---------------------------------------------------------------------------

async fn insert_event(pool: &PgPool) -> Uuid {
    sqlx::query_scalar("INSERT INTO events (name) VALUES ('Constraint live') RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_violation_returns_400(pool: PgPool) {
    let event_id = insert_event(&pool).await;
    let err = sqlx::query(
        "INSERT INTO event_slots (event_id, slot_type, start_time) VALUES ($1, 'band', '1000:00')",
    )
    .bind(event_id)
    .execute(&pool)
    .await
    .unwrap_err();

    let (status, json) = error_to_response(AppError::Database(err)).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("ck_event_slots_start_time_format"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_key_violation_returns_400(pool: PgPool) {
    let event_id = insert_event(&pool).await;
    let err = sqlx::query(
        "INSERT INTO event_slots (event_id, band_id, slot_type) VALUES ($1, $2, 'band')",
    )
    .bind(event_id)
    .bind(Uuid::new_v4())
    .execute(&pool)
    .await
    .unwrap_err();

    let (status, json) = error_to_response(AppError::Database(err)).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unique_violation_returns_409(pool: PgPool) {
    let event_id = insert_event(&pool).await;
    let person_id = Uuid::new_v4();
    let insert = "INSERT INTO event_staff_members (event_id, person_id) VALUES ($1, $2)";
    sqlx::query(insert)
        .bind(event_id)
        .bind(person_id)
        .execute(&pool)
        .await
        .unwrap();
    let err = sqlx::query(insert)
        .bind(event_id)
        .bind(person_id)
        .execute(&pool)
        .await
        .unwrap_err();

    let (status, json) = error_to_response(AppError::Database(err)).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}
