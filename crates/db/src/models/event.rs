//! Event entity model and DTOs.

use gigboard_core::clock::ClockTime;
use gigboard_core::error::CoreError;
use gigboard_core::timetable::{RehearsalOrder, DEFAULT_CHANGEOVER_MIN};
use gigboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub name: String,
    pub default_changeover_min: i32,
    /// Doors / first band, `HH:MM`.
    pub start_time: Option<String>,
    /// Crew gathering, `HH:MM`.
    pub open_time: Option<String>,
    /// `same` or `reverse`.
    pub normal_rehearsal_order: String,
    pub created_at: Timestamp,
}

impl Event {
    /// Parsed start time. `None` when the event has no start yet.
    pub fn start_clock(&self) -> Result<Option<ClockTime>, CoreError> {
        ClockTime::parse_optional(self.start_time.as_deref())
    }

    pub fn open_clock(&self) -> Result<Option<ClockTime>, CoreError> {
        ClockTime::parse_optional(self.open_time.as_deref())
    }

    pub fn rehearsal_order(&self) -> Result<RehearsalOrder, CoreError> {
        self.normal_rehearsal_order.parse()
    }
}

/// DTO for creating a new event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub default_changeover_min: Option<i32>,
    pub start_time: Option<String>,
    pub open_time: Option<String>,
}

impl CreateEvent {
    /// Changeover to store when none was given.
    pub fn changeover_or_default(&self) -> i32 {
        self.default_changeover_min.unwrap_or(DEFAULT_CHANGEOVER_MIN)
    }
}
