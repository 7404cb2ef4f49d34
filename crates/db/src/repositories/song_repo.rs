//! Repository for the `songs` table.

use gigboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::song::{CreateSong, Song};

const COLUMNS: &str = "id, band_id, title, entry_type, duration_sec, order_index, created_at";

/// Provides create and list operations for setlist entries.
pub struct SongRepo;

impl SongRepo {
    /// Insert a new setlist entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSong) -> Result<Song, sqlx::Error> {
        let query = format!(
            "INSERT INTO songs (band_id, title, entry_type, duration_sec, order_index) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Song>(&query)
            .bind(input.band_id)
            .bind(&input.title)
            .bind(&input.entry_type)
            .bind(input.duration_sec)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    /// List every setlist entry of every band in an event.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<Song>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM songs \
             WHERE band_id IN (SELECT id FROM bands WHERE event_id = $1) \
             ORDER BY band_id, order_index NULLS LAST, created_at"
        );
        sqlx::query_as::<_, Song>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }
}
