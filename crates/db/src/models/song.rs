//! Setlist entries (songs and MC breaks) of a band.

use gigboard_core::band_order::SetlistEntry;
use gigboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `entry_type` value marking an MC entry rather than a song.
pub const ENTRY_TYPE_MC: &str = "mc";

/// A row from the `songs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Song {
    pub id: DbId,
    pub band_id: DbId,
    pub title: String,
    /// `song`, `mc`, or null (treated as `song`).
    pub entry_type: Option<String>,
    pub duration_sec: Option<i32>,
    pub order_index: Option<i32>,
    pub created_at: Timestamp,
}

impl Song {
    pub fn is_mc(&self) -> bool {
        self.entry_type.as_deref() == Some(ENTRY_TYPE_MC)
    }

    pub fn setlist_entry(&self) -> SetlistEntry {
        SetlistEntry {
            band_id: Some(self.band_id),
            is_mc: self.is_mc(),
        }
    }
}

/// DTO for creating a new setlist entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSong {
    pub band_id: DbId,
    pub title: String,
    pub entry_type: Option<String>,
    pub duration_sec: Option<i32>,
    pub order_index: Option<i32>,
}
