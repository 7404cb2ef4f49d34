//! Route definitions for the `/events` resource.
//!
//! Everything is scoped to one event: its timetable slots, the suggested
//! band order, the staff roster and the per-slot staff assignments.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{staffing, timetable};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /{event_id}/slots                          -> list_slots
/// POST   /{event_id}/slots                          -> add_slot
/// PUT    /{event_id}/slots                          -> save_slots
/// PUT    /{event_id}/slots/order                    -> reorder_slots
/// PUT    /{event_id}/slots/rehearsal-order          -> sort_rehearsal
/// POST   /{event_id}/slots/generate                 -> generate_slots
/// POST   /{event_id}/slots/template                 -> generate_template
/// DELETE /{event_id}/slots/{slot_id}                -> delete_slot
/// GET    /{event_id}/band-order                     -> suggest_band_order
///
/// GET    /{event_id}/staff                          -> list_staff
/// GET    /{event_id}/assignments                    -> list_assignments
/// POST   /{event_id}/assignments                    -> create_assignment
/// POST   /{event_id}/assignments/auto               -> auto_assign
/// DELETE /{event_id}/assignments/{assignment_id}    -> delete_assignment
/// ```
pub fn router() -> Router<AppState> {
    let slot_routes = Router::new()
        .route(
            "/",
            get(timetable::list_slots)
                .post(timetable::add_slot)
                .put(timetable::save_slots),
        )
        .route("/order", put(timetable::reorder_slots))
        .route("/rehearsal-order", put(timetable::sort_rehearsal))
        .route("/generate", post(timetable::generate_slots))
        .route("/template", post(timetable::generate_template))
        .route("/{slot_id}", delete(timetable::delete_slot));

    let assignment_routes = Router::new()
        .route(
            "/",
            get(staffing::list_assignments).post(staffing::create_assignment),
        )
        .route("/auto", post(staffing::auto_assign))
        .route("/{assignment_id}", delete(staffing::delete_assignment));

    Router::new()
        .nest("/{event_id}/slots", slot_routes)
        .route("/{event_id}/band-order", get(timetable::suggest_band_order))
        .route("/{event_id}/staff", get(staffing::list_staff))
        .nest("/{event_id}/assignments", assignment_routes)
}
