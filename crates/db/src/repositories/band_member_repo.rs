//! Repository for the `band_members` table.

use gigboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::band_member::{BandMember, CreateBandMember};

const COLUMNS: &str = "id, band_id, user_id, instrument, carry_equipment, created_at";

pub struct BandMemberRepo;

impl BandMemberRepo {
    /// Insert a new membership row.
    pub async fn create(pool: &PgPool, input: &CreateBandMember) -> Result<BandMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO band_members (band_id, user_id, instrument, carry_equipment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BandMember>(&query)
            .bind(input.band_id)
            .bind(input.user_id)
            .bind(&input.instrument)
            .bind(&input.carry_equipment)
            .fetch_one(pool)
            .await
    }

    /// List the members of every band in an event.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<BandMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM band_members \
             WHERE band_id IN (SELECT id FROM bands WHERE event_id = $1) \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, BandMember>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }
}
