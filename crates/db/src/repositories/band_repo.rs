//! Repository for the `bands` table.

use gigboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::band::{Band, CreateBand};

const COLUMNS: &str = "id, event_id, name, general_note, is_jam_session, created_at";

/// Provides create and list operations for bands.
pub struct BandRepo;

impl BandRepo {
    /// Insert a new band, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBand) -> Result<Band, sqlx::Error> {
        let query = format!(
            "INSERT INTO bands (event_id, name, general_note, is_jam_session) \
             VALUES ($1, $2, $3, COALESCE($4, false)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Band>(&query)
            .bind(input.event_id)
            .bind(&input.name)
            .bind(&input.general_note)
            .bind(input.is_jam_session)
            .fetch_one(pool)
            .await
    }

    /// List the bands of an event in creation order.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<Band>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bands WHERE event_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Band>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }
}
