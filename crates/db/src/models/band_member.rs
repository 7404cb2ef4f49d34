//! Band membership rows.

use gigboard_core::band_order::MemberEntry;
use gigboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `band_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BandMember {
    pub id: DbId,
    pub band_id: DbId,
    pub user_id: DbId,
    pub instrument: String,
    pub carry_equipment: Option<String>,
    pub created_at: Timestamp,
}

impl BandMember {
    pub fn member_entry(&self) -> MemberEntry {
        MemberEntry {
            band_id: Some(self.band_id),
            user_id: Some(self.user_id),
            instrument: Some(self.instrument.clone()),
            carry_equipment: self.carry_equipment.clone(),
        }
    }
}

/// DTO for adding a member to a band.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBandMember {
    pub band_id: DbId,
    pub user_id: DbId,
    pub instrument: String,
    pub carry_equipment: Option<String>,
}
