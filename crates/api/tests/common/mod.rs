#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use gigboard_core::types::DbId;
use gigboard_db::models::band::CreateBand;
use gigboard_db::models::event::CreateEvent;
use gigboard_db::models::song::CreateSong;
use gigboard_db::models::staff::CreateEventStaffMember;
use gigboard_db::repositories::{BandRepo, EventRepo, EventStaffRepo, SongRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use gigboard_api::config::ServerConfig;
use gigboard_api::router::build_app_router;
use gigboard_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_event(pool: &PgPool, changeover: i32, start_time: Option<&str>) -> DbId {
    EventRepo::create(
        pool,
        &CreateEvent {
            name: "Test live".to_string(),
            default_changeover_min: Some(changeover),
            start_time: start_time.map(str::to_string),
            open_time: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_band(pool: &PgPool, event_id: DbId, name: &str, song_secs: &[i32]) -> DbId {
    let band = BandRepo::create(
        pool,
        &CreateBand {
            event_id,
            name: name.to_string(),
            general_note: None,
            is_jam_session: None,
        },
    )
    .await
    .unwrap();

    for (i, secs) in song_secs.iter().enumerate() {
        SongRepo::create(
            pool,
            &CreateSong {
                band_id: band.id,
                title: format!("{name} #{i}"),
                entry_type: None,
                duration_sec: Some(*secs),
                order_index: Some(i as i32 + 1),
            },
        )
        .await
        .unwrap();
    }
    band.id
}

pub async fn seed_staff(pool: &PgPool, event_id: DbId, can_pa: bool, can_light: bool) -> DbId {
    EventStaffRepo::create(
        pool,
        &CreateEventStaffMember {
            event_id,
            person_id: uuid::Uuid::new_v4(),
            can_pa: Some(can_pa),
            can_light: Some(can_light),
            note: None,
        },
    )
    .await
    .unwrap()
    .person_id
}
