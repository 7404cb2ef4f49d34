//! Slot staff assignment model and DTOs.

use gigboard_core::error::CoreError;
use gigboard_core::staffing::{ExistingAssignment, StaffRole};
use gigboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `slot_staff_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SlotStaffAssignment {
    pub id: DbId,
    pub event_slot_id: DbId,
    pub person_id: DbId,
    pub role: String,
    pub is_fixed: bool,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

impl SlotStaffAssignment {
    pub fn to_existing(&self) -> Result<ExistingAssignment, CoreError> {
        Ok(ExistingAssignment {
            event_slot_id: self.event_slot_id,
            person_id: self.person_id,
            role: self.role.parse()?,
            is_fixed: self.is_fixed,
        })
    }
}

/// Convert a list of rows, failing on the first unknown role.
pub fn to_existing(rows: &[SlotStaffAssignment]) -> Result<Vec<ExistingAssignment>, CoreError> {
    rows.iter().map(SlotStaffAssignment::to_existing).collect()
}

/// DTO for a manual assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlotStaffAssignment {
    pub event_slot_id: DbId,
    pub person_id: DbId,
    pub role: StaffRole,
    pub is_fixed: Option<bool>,
    pub note: Option<String>,
}
