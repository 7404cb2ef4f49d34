//! HTTP-level integration tests for the timetable endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post, put_json, seed_band, seed_event};
use gigboard_db::models::band::CreateBand;
use gigboard_db::models::band_member::CreateBandMember;
use gigboard_db::repositories::{BandMemberRepo, BandRepo};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

fn slots_url(event_id: Uuid) -> String {
    format!("/api/v1/events/{event_id}/slots")
}

async fn generate(pool: &PgPool, event_id: Uuid) -> Vec<Value> {
    let app = common::build_test_app(pool.clone());
    let response = post(app, &format!("{}/generate", slots_url(event_id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_lays_out_bands_and_changeovers(pool: PgPool) {
    let event_id = seed_event(&pool, 10, Some("18:00")).await;
    let first = seed_band(&pool, event_id, "Opener", &[600, 300]).await;
    let second = seed_band(&pool, event_id, "Closer", &[]).await;

    let slots = generate(&pool, event_id).await;
    assert_eq!(slots.len(), 3);

    assert_eq!(slots[0]["slot_type"], "band");
    assert_eq!(slots[0]["band_id"], first.to_string());
    assert_eq!(slots[0]["order_in_event"], 1);
    assert_eq!(slots[0]["start_time"], "18:00");
    assert_eq!(slots[0]["end_time"], "18:15");

    assert_eq!(slots[1]["slot_type"], "other");
    assert_eq!(slots[1]["note"], "転換");
    assert_eq!(slots[1]["band_id"], Value::Null);
    assert_eq!(slots[1]["start_time"], "18:15");
    assert_eq!(slots[1]["end_time"], "18:25");

    assert_eq!(slots[2]["band_id"], second.to_string());
    assert_eq!(slots[2]["start_time"], "18:25");
    assert_eq!(slots[2]["end_time"], Value::Null);
    assert!(slots.iter().all(|s| s["changeover_min"] == 10));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_regenerate_replaces_previous_slots(pool: PgPool) {
    let event_id = seed_event(&pool, 5, None).await;
    seed_band(&pool, event_id, "A", &[120]).await;
    seed_band(&pool, event_id, "B", &[120]).await;

    let first = generate(&pool, event_id).await;
    let second = generate(&pool, event_id).await;
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    assert_ne!(first[0]["id"], second[0]["id"]);

    let app = common::build_test_app(pool);
    let listed = body_json(get(app, &slots_url(event_id)).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 3);
    assert!(listed["data"][0]["start_time"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_without_bands_is_validation_error(pool: PgPool) {
    let event_id = seed_event(&pool, 10, Some("18:00")).await;

    let app = common::build_test_app(pool);
    let response = post(app, &format!("{}/generate", slots_url(event_id))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "no bands to schedule");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_for_unknown_event_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post(app, &format!("{}/generate", slots_url(Uuid::new_v4()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Manual edits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_slot_appends_blank_band_slot(pool: PgPool) {
    let event_id = seed_event(&pool, 12, None).await;

    let app = common::build_test_app(pool.clone());
    let response = post(app, &slots_url(event_id)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["order_in_event"], 1);
    assert_eq!(created["data"]["slot_type"], "band");
    assert_eq!(created["data"]["changeover_min"], 12);

    let app = common::build_test_app(pool);
    let second = body_json(post(app, &slots_url(event_id)).await).await;
    assert_eq!(second["data"]["order_in_event"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_normalizes_and_renumbers(pool: PgPool) {
    let event_id = seed_event(&pool, 10, None).await;
    seed_band(&pool, event_id, "A", &[]).await;
    seed_band(&pool, event_id, "B", &[]).await;
    let mut slots = generate(&pool, event_id).await;

    slots.push(json!({
        "slot_type": "mc",
        "note": "  ",
        "order_in_event": null,
        "start_time": "21:00",
    }));

    let app = common::build_test_app(pool.clone());
    let response = put_json(app, &slots_url(event_id), Value::Array(slots)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let saved = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(saved.len(), 4);
    assert_eq!(saved[1]["slot_type"], "break");
    assert_eq!(saved[1]["note"], "転換");
    assert_eq!(saved[3]["slot_type"], "other");
    assert_eq!(saved[3]["note"], Value::Null);
    assert_eq!(saved[3]["start_time"], "21:00");
    let orders: Vec<i64> = saved.iter().map(|s| s["order_in_event"].as_i64().unwrap()).collect();
    assert_eq!(orders, vec![1, 2, 3, 4]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_rejects_malformed_time(pool: PgPool) {
    let event_id = seed_event(&pool, 10, None).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &slots_url(event_id),
        json!([{ "slot_type": "other", "start_time": "18:75" }]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_rejects_hour_beyond_storage_range(pool: PgPool) {
    let event_id = seed_event(&pool, 10, None).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &slots_url(event_id),
        json!([{ "slot_type": "other", "start_time": "1000:00" }]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_rejects_band_from_other_event(pool: PgPool) {
    let event_id = seed_event(&pool, 10, None).await;
    let other_event = seed_event(&pool, 10, None).await;
    let stranger = seed_band(&pool, other_event, "Elsewhere", &[]).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &slots_url(event_id),
        json!([{ "slot_type": "band", "band_id": stranger }]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_renumbers_densely(pool: PgPool) {
    let event_id = seed_event(&pool, 10, None).await;
    seed_band(&pool, event_id, "A", &[]).await;
    seed_band(&pool, event_id, "B", &[]).await;
    let slots = generate(&pool, event_id).await;
    let reversed: Vec<Value> = slots.iter().rev().map(|s| s["id"].clone()).collect();

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("{}/order", slots_url(event_id)),
        json!({ "slot_ids": reversed }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let listed = body_json(get(app, &slots_url(event_id)).await).await;
    let listed = listed["data"].as_array().unwrap();
    let ids: Vec<Value> = listed.iter().map(|s| s["id"].clone()).collect();
    assert_eq!(ids, reversed);
    let orders: Vec<i64> = listed.iter().map(|s| s["order_in_event"].as_i64().unwrap()).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_with_partial_list_is_rejected(pool: PgPool) {
    let event_id = seed_event(&pool, 10, None).await;
    seed_band(&pool, event_id, "A", &[]).await;
    seed_band(&pool, event_id, "B", &[]).await;
    let slots = generate(&pool, event_id).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("{}/order", slots_url(event_id)),
        json!({ "slot_ids": [slots[0]["id"]] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_slot(pool: PgPool) {
    let event_id = seed_event(&pool, 10, None).await;
    seed_band(&pool, event_id, "A", &[]).await;
    let slots = generate(&pool, event_id).await;
    let slot_id = slots[0]["id"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("{}/{slot_id}", slots_url(event_id))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("{}/{slot_id}", slots_url(event_id))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Template and rehearsal order
// ---------------------------------------------------------------------------

async fn template(pool: &PgPool, event_id: Uuid) -> Vec<Value> {
    let app = common::build_test_app(pool.clone());
    let response = post(app, &format!("{}/template", slots_url(event_id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].as_array().unwrap().clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_builds_rehearsal_and_show(pool: PgPool) {
    let event_id = seed_event(&pool, 5, Some("18:00")).await;
    let first = seed_band(&pool, event_id, "Opener", &[600]).await;
    let second = seed_band(&pool, event_id, "Closer", &[]).await;

    let slots = template(&pool, event_id).await;
    assert_eq!(slots.len(), 9);

    let phases: Vec<&str> = slots.iter().map(|s| s["slot_phase"].as_str().unwrap()).collect();
    assert_eq!(&phases[..5], ["rehearsal_normal"; 5]);
    assert_eq!(&phases[5..], ["show"; 4]);

    assert_eq!(slots[0]["note"], "集合～準備");
    assert_eq!(slots[0]["start_time"], "16:25");
    assert_eq!(slots[1]["band_id"], first.to_string());
    assert_eq!(slots[2]["slot_type"], "break");
    assert_eq!(slots[4]["note"], "休憩");
    assert_eq!(slots[4]["end_time"], "18:00");
    assert_eq!(slots[5]["start_time"], "18:00");
    assert_eq!(slots[7]["band_id"], second.to_string());
    assert_eq!(slots[8]["note"], "終了～撤収");
    assert_eq!(slots[8]["end_time"], "19:25");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rehearsal_order_is_applied_and_remembered(pool: PgPool) {
    let event_id = seed_event(&pool, 5, Some("18:00")).await;
    let first = seed_band(&pool, event_id, "Opener", &[]).await;
    let second = seed_band(&pool, event_id, "Closer", &[]).await;
    template(&pool, event_id).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("{}/rehearsal-order", slots_url(event_id)),
        json!({ "phase": "rehearsal_normal", "order": "reverse" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let sorted = body_json(response).await["data"].as_array().unwrap().clone();

    let rehearsal_bands: Vec<&str> = sorted
        .iter()
        .filter(|s| s["slot_phase"] == "rehearsal_normal" && s["slot_type"] == "band")
        .map(|s| s["band_id"].as_str().unwrap())
        .collect();
    assert_eq!(rehearsal_bands, [second.to_string(), first.to_string()]);
    let show_bands: Vec<&str> = sorted
        .iter()
        .filter(|s| s["slot_phase"] == "show" && s["slot_type"] == "band")
        .map(|s| s["band_id"].as_str().unwrap())
        .collect();
    assert_eq!(show_bands, [first.to_string(), second.to_string()]);

    let regenerated = template(&pool, event_id).await;
    assert_eq!(regenerated[1]["band_id"], second.to_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rehearsal_order_rejects_show_phase(pool: PgPool) {
    let event_id = seed_event(&pool, 5, None).await;
    seed_band(&pool, event_id, "Only", &[]).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("{}/rehearsal-order", slots_url(event_id)),
        json!({ "phase": "show", "order": "same" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Band order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_band_order_moves_jam_session_last(pool: PgPool) {
    let event_id = seed_event(&pool, 10, None).await;
    let jam = BandRepo::create(
        &pool,
        &CreateBand {
            event_id,
            name: "Session".to_string(),
            general_note: None,
            is_jam_session: Some(true),
        },
    )
    .await
    .unwrap();
    let a = seed_band(&pool, event_id, "A", &[]).await;
    let b = seed_band(&pool, event_id, "B", &[]).await;
    BandMemberRepo::create(
        &pool,
        &CreateBandMember {
            band_id: a,
            user_id: Uuid::new_v4(),
            instrument: "Gt".to_string(),
            carry_equipment: None,
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/events/{event_id}/band-order")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ids: Vec<String> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![a.to_string(), b.to_string(), jam.id.to_string()]);
}
