//! Timetable slot model and DTOs.
//!
//! Rows store `slot_type`, `slot_phase` and the `HH:MM` times as text. [`EventSlot::to_slot`]
//! lifts a row into the typed [`Slot`] the timetable functions work on.

use gigboard_core::clock::ClockTime;
use gigboard_core::error::CoreError;
use gigboard_core::timetable::{RehearsalOrder, Slot, SlotPhase};
use gigboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `event_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventSlot {
    pub id: DbId,
    pub event_id: DbId,
    pub band_id: Option<DbId>,
    pub slot_type: String,
    pub slot_phase: String,
    pub order_in_event: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub changeover_min: Option<i32>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

impl EventSlot {
    /// Parse the stored text columns into a typed slot.
    pub fn to_slot(&self) -> Result<Slot, CoreError> {
        Ok(Slot {
            id: self.id,
            band_id: self.band_id,
            slot_type: self.slot_type.parse()?,
            slot_phase: self.slot_phase.parse()?,
            order_in_event: self.order_in_event,
            start_time: ClockTime::parse_optional(self.start_time.as_deref())?,
            end_time: ClockTime::parse_optional(self.end_time.as_deref())?,
            changeover_min: self.changeover_min,
            note: self.note.clone(),
        })
    }
}

/// Convert a list of rows, failing on the first malformed one.
pub fn to_slots(rows: &[EventSlot]) -> Result<Vec<Slot>, CoreError> {
    rows.iter().map(EventSlot::to_slot).collect()
}

/// One slot as sent by the timetable editor on save.
///
/// Slots created in the editor carry a client-generated id; a missing id
/// gets a fresh one. A missing phase means `show`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveEventSlot {
    pub id: Option<DbId>,
    pub band_id: Option<DbId>,
    pub slot_type: String,
    pub slot_phase: Option<String>,
    pub order_in_event: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub changeover_min: Option<i32>,
    pub note: Option<String>,
}

impl SaveEventSlot {
    /// Validate the free-form fields and build a typed slot.
    pub fn into_slot(self) -> Result<Slot, CoreError> {
        Ok(Slot {
            id: self.id.unwrap_or_else(uuid::Uuid::new_v4),
            band_id: self.band_id,
            slot_type: self.slot_type.trim().parse()?,
            slot_phase: match self.slot_phase.as_deref().map(str::trim) {
                None | Some("") => SlotPhase::Show,
                Some(phase) => phase.parse()?,
            },
            order_in_event: self.order_in_event,
            start_time: ClockTime::parse_optional(self.start_time.as_deref())?,
            end_time: ClockTime::parse_optional(self.end_time.as_deref())?,
            changeover_min: self.changeover_min,
            note: self.note,
        })
    }
}

/// Request body for `PUT .../slots/order`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderSlots {
    pub slot_ids: Vec<DbId>,
}

/// Request body for `PUT .../slots/rehearsal-order`.
#[derive(Debug, Clone, Deserialize)]
pub struct SortRehearsal {
    pub phase: SlotPhase,
    pub order: RehearsalOrder,
}
