//! Band entity model and DTOs.

use gigboard_core::band_order::BandProfile;
use gigboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bands` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Band {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub general_note: Option<String>,
    pub is_jam_session: bool,
    pub created_at: Timestamp,
}

impl Band {
    pub fn profile(&self) -> BandProfile {
        BandProfile {
            id: self.id,
            general_note: self.general_note.clone(),
            is_jam_session: self.is_jam_session,
        }
    }
}

/// DTO for creating a new band.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBand {
    pub event_id: DbId,
    pub name: String,
    pub general_note: Option<String>,
    pub is_jam_session: Option<bool>,
}
