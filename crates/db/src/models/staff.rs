//! Event staff roster model and DTOs.

use gigboard_core::staffing::StaffCapability;
use gigboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `event_staff_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventStaffMember {
    pub id: DbId,
    pub event_id: DbId,
    pub person_id: DbId,
    pub can_pa: bool,
    pub can_light: bool,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

impl EventStaffMember {
    pub fn capability(&self) -> StaffCapability {
        StaffCapability {
            person_id: self.person_id,
            can_pa: self.can_pa,
            can_light: self.can_light,
        }
    }
}

/// DTO for adding a person to an event's staff roster.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventStaffMember {
    pub event_id: DbId,
    pub person_id: DbId,
    pub can_pa: Option<bool>,
    pub can_light: Option<bool>,
    pub note: Option<String>,
}
