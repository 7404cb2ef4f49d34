pub mod staffing;
pub mod timetable;

use gigboard_core::error::CoreError;
use gigboard_core::timetable::{sort_slots, Slot};
use gigboard_core::types::DbId;
use gigboard_db::models::event::Event;
use gigboard_db::models::event_slot::to_slots;
use gigboard_db::repositories::{EventRepo, EventSlotRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Load an event or fail with 404.
pub(crate) async fn ensure_event(pool: &PgPool, event_id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))
}

/// A stored row that fails to parse is a storage fault, not a client error.
pub(crate) fn stored_row_fault(err: CoreError) -> CoreError {
    CoreError::Internal(format!("Malformed stored row: {err}"))
}

/// Load an event's slots as typed values in running order.
pub(crate) async fn load_slots(pool: &PgPool, event_id: DbId) -> AppResult<Vec<Slot>> {
    let rows = EventSlotRepo::list_by_event(pool, event_id).await?;
    let mut slots = to_slots(&rows).map_err(stored_row_fault)?;
    sort_slots(&mut slots);
    Ok(slots)
}
