//! Liveness endpoint, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Up,
    Down,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub database: DatabaseStatus,
}

/// GET /health
///
/// 200 while the database answers, 503 otherwise. The body is the same in
/// both cases so load balancers can log it.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database) = match gigboard_db::health_check(&state.pool).await {
        Ok(()) => (StatusCode::OK, DatabaseStatus::Up),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            (StatusCode::SERVICE_UNAVAILABLE, DatabaseStatus::Down)
        }
    };

    let body = HealthResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        database,
    };
    (status, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
