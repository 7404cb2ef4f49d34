//! Handlers for an event's timetable.
//!
//! Covers listing, manual editing (add, save, reorder, delete), automatic
//! generation from the band roster (show only, or the full day template),
//! rehearsal ordering, and the suggested band order.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gigboard_core::band_order::{self, MemberEntry, SetlistEntry};
use gigboard_core::error::CoreError;
use gigboard_core::timetable::{
    self, apply_rehearsal_order, band_song_seconds, new_manual_slot, normalize_for_save,
    sequence_slots, template_slots, validate_band_refs, validate_bands_present, Slot, SlotPhase,
};
use gigboard_core::types::DbId;
use gigboard_db::models::band::Band;
use gigboard_db::models::event_slot::{ReorderSlots, SaveEventSlot, SortRehearsal};
use gigboard_db::repositories::{BandMemberRepo, BandRepo, EventRepo, EventSlotRepo, SongRepo};

use super::{ensure_event, load_slots, stored_row_fault};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listing and manual edits
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{event_id}/slots
pub async fn list_slots(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    ensure_event(&state.pool, event_id).await?;
    let slots = load_slots(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// POST /api/v1/events/{event_id}/slots
///
/// Append a blank band slot after the current last slot.
pub async fn add_slot(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Slot>>)> {
    let event = ensure_event(&state.pool, event_id).await?;
    let existing = load_slots(&state.pool, event_id).await?;

    let slot = new_manual_slot(uuid::Uuid::new_v4(), &existing, event.default_changeover_min);
    EventSlotRepo::create(&state.pool, event_id, &slot).await?;

    tracing::debug!(%event_id, slot_id = %slot.id, "Slot added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: slot })))
}

/// PUT /api/v1/events/{event_id}/slots
///
/// Save the edited timetable. Slots are normalised, renumbered and upserted
/// by id; slots not in the payload are left as they are.
pub async fn save_slots(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<Vec<SaveEventSlot>>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    ensure_event(&state.pool, event_id).await?;

    let edited = input
        .into_iter()
        .map(SaveEventSlot::into_slot)
        .collect::<Result<Vec<_>, CoreError>>()?;
    let normalized = normalize_for_save(edited);

    let event_bands: HashSet<DbId> = BandRepo::list_by_event(&state.pool, event_id)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();
    validate_band_refs(&normalized, &event_bands)?;

    EventSlotRepo::upsert_batch(&state.pool, event_id, &normalized).await?;
    tracing::info!(%event_id, saved = normalized.len(), "Timetable saved");

    let slots = load_slots(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// PUT /api/v1/events/{event_id}/slots/order
///
/// Body: `{ "slot_ids": [...] }`, every slot of the event exactly once.
pub async fn reorder_slots(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<ReorderSlots>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    ensure_event(&state.pool, event_id).await?;
    let current = load_slots(&state.pool, event_id).await?;

    let reordered = timetable::reorder(current, &input.slot_ids)?;
    EventSlotRepo::upsert_batch(&state.pool, event_id, &reordered).await?;

    tracing::debug!(%event_id, slots = reordered.len(), "Timetable reordered");
    Ok(Json(DataResponse { data: reordered }))
}

/// PUT /api/v1/events/{event_id}/slots/rehearsal-order
///
/// Body: `{ "phase": "rehearsal_normal", "order": "reverse" }`. Re-sorts the
/// band slots of that rehearsal phase against the band roster. The order
/// chosen for normal rehearsals is kept on the event for later templates.
pub async fn sort_rehearsal(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<SortRehearsal>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    ensure_event(&state.pool, event_id).await?;
    let band_ids: Vec<DbId> = BandRepo::list_by_event(&state.pool, event_id)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();
    let current = load_slots(&state.pool, event_id).await?;

    let sorted = apply_rehearsal_order(current, input.phase, &band_ids, input.order)?;
    EventSlotRepo::upsert_batch(&state.pool, event_id, &sorted).await?;
    if input.phase == SlotPhase::RehearsalNormal {
        EventRepo::set_rehearsal_order(&state.pool, event_id, input.order).await?;
    }

    tracing::debug!(
        %event_id,
        phase = input.phase.as_str(),
        order = input.order.as_str(),
        "Rehearsal order applied",
    );
    Ok(Json(DataResponse { data: sorted }))
}

/// DELETE /api/v1/events/{event_id}/slots/{slot_id}
pub async fn delete_slot(
    State(state): State<AppState>,
    Path((event_id, slot_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let deleted = EventSlotRepo::delete(&state.pool, event_id, slot_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "EventSlot",
            id: slot_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// POST /api/v1/events/{event_id}/slots/generate
///
/// Rebuild the timetable from the band roster in creation order. Every
/// existing slot of the event (and its assignments) is replaced.
pub async fn generate_slots(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    let event = ensure_event(&state.pool, event_id).await?;
    let bands = BandRepo::list_by_event(&state.pool, event_id).await?;
    validate_bands_present(bands.len())?;

    let songs = SongRepo::list_by_event(&state.pool, event_id).await?;
    let song_seconds = band_song_seconds(songs.iter().map(|s| (Some(s.band_id), s.duration_sec)));
    let band_ids: Vec<DbId> = bands.iter().map(|b| b.id).collect();

    let plans = sequence_slots(
        &band_ids,
        &song_seconds,
        event.default_changeover_min,
        event.start_clock()?,
    );
    EventSlotRepo::replace_for_event(&state.pool, event_id, &plans).await?;

    tracing::info!(
        %event_id,
        bands = band_ids.len(),
        slots = plans.len(),
        "Timetable generated",
    );

    let slots = load_slots(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// POST /api/v1/events/{event_id}/slots/template
///
/// Rebuild the whole event day: prep, rehearsals in the event's stored
/// rehearsal order, rest, show and cleanup. Replaces every existing slot
/// like `generate`.
pub async fn generate_template(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    let event = ensure_event(&state.pool, event_id).await?;
    let bands = BandRepo::list_by_event(&state.pool, event_id).await?;
    validate_bands_present(bands.len())?;

    let songs = SongRepo::list_by_event(&state.pool, event_id).await?;
    let song_seconds = band_song_seconds(songs.iter().map(|s| (Some(s.band_id), s.duration_sec)));
    let band_ids: Vec<DbId> = bands.iter().map(|b| b.id).collect();
    let rehearsal_order = event.rehearsal_order().map_err(stored_row_fault)?;

    let plans = template_slots(
        &band_ids,
        &song_seconds,
        event.default_changeover_min,
        event.open_clock()?,
        event.start_clock()?,
        rehearsal_order,
    );
    EventSlotRepo::replace_for_event(&state.pool, event_id, &plans).await?;

    tracing::info!(
        %event_id,
        bands = band_ids.len(),
        slots = plans.len(),
        rehearsal_order = rehearsal_order.as_str(),
        "Timetable template generated",
    );

    let slots = load_slots(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: slots }))
}

// ---------------------------------------------------------------------------
// Band order
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{event_id}/band-order
///
/// The event's bands in suggested running order. Read-only: applying the
/// order is up to the client.
pub async fn suggest_band_order(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Band>>>> {
    ensure_event(&state.pool, event_id).await?;
    let bands = BandRepo::list_by_event(&state.pool, event_id).await?;
    let songs = SongRepo::list_by_event(&state.pool, event_id).await?;
    let members = BandMemberRepo::list_by_event(&state.pool, event_id).await?;

    let profiles: Vec<_> = bands.iter().map(Band::profile).collect();
    let setlist: Vec<SetlistEntry> = songs.iter().map(|s| s.setlist_entry()).collect();
    let member_entries: Vec<MemberEntry> = members.iter().map(|m| m.member_entry()).collect();

    let order = band_order::suggest_band_order(&profiles, &setlist, &member_entries);

    let mut remaining = bands;
    let mut ordered = Vec::with_capacity(order.len());
    for id in order {
        if let Some(index) = remaining.iter().position(|b| b.id == id) {
            ordered.push(remaining.swap_remove(index));
        }
    }
    Ok(Json(DataResponse { data: ordered }))
}
