//! Crew staffing: which PA and lighting staff cover which slot.
//!
//! Staff members carry one capability flag per role. Auto-assignment walks
//! the running order and hands every uncovered slot to the next eligible
//! person in a round-robin rotation, independently per role.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Operational role a staff member can be assigned to on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Pa,
    Light,
}

impl StaffRole {
    /// Value stored in `slot_staff_assignments.role`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pa => "pa",
            Self::Light => "light",
        }
    }
}

impl FromStr for StaffRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pa" => Ok(Self::Pa),
            "light" => Ok(Self::Light),
            other => Err(CoreError::Validation(format!("Unknown staff role '{other}'"))),
        }
    }
}

/// Roles filled by an auto-assign run, in processing order.
pub const AUTO_ASSIGN_ROLES: [StaffRole; 2] = [StaffRole::Pa, StaffRole::Light];

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// A roster entry reduced to what assignment needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCapability {
    pub person_id: DbId,
    pub can_pa: bool,
    pub can_light: bool,
}

impl StaffCapability {
    /// Whether this person may work `role`.
    pub fn can(&self, role: StaffRole) -> bool {
        match role {
            StaffRole::Pa => self.can_pa,
            StaffRole::Light => self.can_light,
        }
    }
}

/// An assignment that already exists on a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingAssignment {
    pub event_slot_id: DbId,
    pub person_id: DbId,
    pub role: StaffRole,
    pub is_fixed: bool,
}

/// An assignment produced by [`auto_assign`], ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAssignment {
    pub event_slot_id: DbId,
    pub person_id: DbId,
    pub role: StaffRole,
    pub is_fixed: bool,
}

/// Result of an auto-assign run as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoAssignOutcome {
    /// At least one assignment was created.
    Assigned,
    /// Every slot was already covered or nobody was eligible. Not an error.
    NothingToAssign,
}

impl AutoAssignOutcome {
    /// Classify a planned batch.
    pub fn for_batch(batch: &[NewAssignment]) -> Self {
        if batch.is_empty() {
            Self::NothingToAssign
        } else {
            Self::Assigned
        }
    }
}

// ---------------------------------------------------------------------------
// Auto-assignment
// ---------------------------------------------------------------------------

/// Fill every uncovered (slot, role) pair with an eligible staff member.
///
/// `slot_ids` must already be in running order and `staff` in roster order.
/// For each role, a slot counts as covered when it has any assignment of
/// that role, pinned or not. Uncovered slots receive candidates in rotation,
/// starting from the first eligible person on every call.
pub fn auto_assign(
    slot_ids: &[DbId],
    staff: &[StaffCapability],
    existing: &[ExistingAssignment],
    roles: &[StaffRole],
) -> Vec<NewAssignment> {
    let mut batch = Vec::new();

    for &role in roles {
        let candidates: Vec<DbId> = staff
            .iter()
            .filter(|member| member.can(role))
            .map(|member| member.person_id)
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let covered: HashSet<DbId> = existing
            .iter()
            .filter(|a| a.role == role)
            .map(|a| a.event_slot_id)
            .collect();

        let mut cursor = 0usize;
        for slot_id in slot_ids.iter().filter(|id| !covered.contains(id)) {
            batch.push(NewAssignment {
                event_slot_id: *slot_id,
                person_id: candidates[cursor % candidates.len()],
                role,
                is_fixed: false,
            });
            cursor += 1;
        }
    }

    batch
}

// ---------------------------------------------------------------------------
// Manual assignment
// ---------------------------------------------------------------------------

/// Validate a hand-picked assignment before it is inserted.
///
/// The person must be on the roster with the role's capability, and must
/// not already hold that role on the slot.
pub fn check_manual_assignment(
    staff: &[StaffCapability],
    existing: &[ExistingAssignment],
    event_slot_id: DbId,
    person_id: DbId,
    role: StaffRole,
) -> Result<(), CoreError> {
    let eligible = staff
        .iter()
        .any(|member| member.person_id == person_id && member.can(role));
    if !eligible {
        return Err(CoreError::Validation(format!(
            "Person {person_id} is not on the staff roster for role '{}'",
            role.as_str()
        )));
    }

    let duplicate = existing.iter().any(|a| {
        a.event_slot_id == event_slot_id && a.person_id == person_id && a.role == role
    });
    if duplicate {
        return Err(CoreError::Conflict(format!(
            "Person {person_id} is already assigned as '{}' on slot {event_slot_id}",
            role.as_str()
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
