//! Repository for the `event_staff_members` table.

use gigboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::staff::{CreateEventStaffMember, EventStaffMember};

const COLUMNS: &str = "id, event_id, person_id, can_pa, can_light, note, created_at";

/// Provides create and list operations for an event's staff roster.
pub struct EventStaffRepo;

impl EventStaffRepo {
    /// Add a person to the roster, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEventStaffMember,
    ) -> Result<EventStaffMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_staff_members (event_id, person_id, can_pa, can_light, note) \
             VALUES ($1, $2, COALESCE($3, false), COALESCE($4, false), $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventStaffMember>(&query)
            .bind(input.event_id)
            .bind(input.person_id)
            .bind(input.can_pa)
            .bind(input.can_light)
            .bind(&input.note)
            .fetch_one(pool)
            .await
    }

    /// List the roster in creation order. Auto-assignment rotates in this order.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<EventStaffMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_staff_members \
             WHERE event_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, EventStaffMember>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }
}
