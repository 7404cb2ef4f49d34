pub mod event;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events/{event_id}/slots                         timetable (see event::router)
/// /events/{event_id}/band-order                    suggested running order
/// /events/{event_id}/staff                         staff roster
/// /events/{event_id}/assignments                   PA / lighting assignments
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Event-scoped timetable and staffing routes.
        .nest("/events", event::router())
}
