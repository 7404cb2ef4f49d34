//! Handlers for an event's staff roster and slot assignments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gigboard_core::error::CoreError;
use gigboard_core::staffing::{
    self, check_manual_assignment, AutoAssignOutcome, StaffCapability, AUTO_ASSIGN_ROLES,
};
use gigboard_core::types::DbId;
use gigboard_db::models::assignment::{to_existing, CreateSlotStaffAssignment, SlotStaffAssignment};
use gigboard_db::models::staff::EventStaffMember;
use gigboard_db::repositories::{EventSlotRepo, EventStaffRepo, SlotStaffAssignmentRepo};
use serde::Serialize;
use sqlx::PgPool;

use super::{ensure_event, load_slots, stored_row_fault};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload of an auto-assign run.
#[derive(Debug, Serialize)]
pub struct AutoAssignResult {
    pub outcome: AutoAssignOutcome,
    pub assignments: Vec<SlotStaffAssignment>,
}

async fn roster_capabilities(pool: &PgPool, event_id: DbId) -> AppResult<Vec<StaffCapability>> {
    let roster = EventStaffRepo::list_by_event(pool, event_id).await?;
    Ok(roster.iter().map(EventStaffMember::capability).collect())
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{event_id}/staff
pub async fn list_staff(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EventStaffMember>>>> {
    ensure_event(&state.pool, event_id).await?;
    let staff = EventStaffRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: staff }))
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{event_id}/assignments
pub async fn list_assignments(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SlotStaffAssignment>>>> {
    ensure_event(&state.pool, event_id).await?;
    let assignments = SlotStaffAssignmentRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: assignments }))
}

/// POST /api/v1/events/{event_id}/assignments
///
/// Hand-pick a staff member for a slot. The person must be on the roster
/// with the role's capability and must not already hold the role there.
pub async fn create_assignment(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateSlotStaffAssignment>,
) -> AppResult<(StatusCode, Json<DataResponse<SlotStaffAssignment>>)> {
    ensure_event(&state.pool, event_id).await?;
    EventSlotRepo::find_by_id(&state.pool, event_id, input.event_slot_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EventSlot",
            id: input.event_slot_id,
        }))?;

    let staff = roster_capabilities(&state.pool, event_id).await?;
    let on_slot = SlotStaffAssignmentRepo::list_by_slots(&state.pool, &[input.event_slot_id]).await?;
    let existing = to_existing(&on_slot).map_err(stored_row_fault)?;
    check_manual_assignment(
        &staff,
        &existing,
        input.event_slot_id,
        input.person_id,
        input.role,
    )?;

    let assignment = SlotStaffAssignmentRepo::create(&state.pool, &input).await?;
    tracing::debug!(
        %event_id,
        slot_id = %assignment.event_slot_id,
        person_id = %assignment.person_id,
        role = %assignment.role,
        "Staff assigned",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// POST /api/v1/events/{event_id}/assignments/auto
///
/// Fill every uncovered (slot, role) pair for PA and lighting in a
/// round-robin over the eligible roster. Nothing to fill is reported as
/// `nothing_to_assign`, not as an error.
pub async fn auto_assign(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<AutoAssignResult>>> {
    ensure_event(&state.pool, event_id).await?;

    let slots = load_slots(&state.pool, event_id).await?;
    let slot_ids: Vec<DbId> = slots.iter().map(|s| s.id).collect();
    let staff = roster_capabilities(&state.pool, event_id).await?;
    let rows = SlotStaffAssignmentRepo::list_by_slots(&state.pool, &slot_ids).await?;
    let existing = to_existing(&rows).map_err(stored_row_fault)?;

    let batch = staffing::auto_assign(&slot_ids, &staff, &existing, &AUTO_ASSIGN_ROLES);
    let outcome = AutoAssignOutcome::for_batch(&batch);

    let assignments = match outcome {
        AutoAssignOutcome::NothingToAssign => Vec::new(),
        AutoAssignOutcome::Assigned => {
            SlotStaffAssignmentRepo::create_batch(&state.pool, &batch).await?
        }
    };

    tracing::info!(
        %event_id,
        slots = slot_ids.len(),
        created = assignments.len(),
        ?outcome,
        "Auto-assign finished",
    );

    Ok(Json(DataResponse {
        data: AutoAssignResult {
            outcome,
            assignments,
        },
    }))
}

/// DELETE /api/v1/events/{event_id}/assignments/{assignment_id}
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path((event_id, assignment_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let deleted = SlotStaffAssignmentRepo::delete(&state.pool, event_id, assignment_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "SlotStaffAssignment",
            id: assignment_id,
        }))
    }
}
