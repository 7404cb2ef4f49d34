//! Repository for the `events` table.

use gigboard_core::timetable::RehearsalOrder;
use gigboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, default_changeover_min, start_time, open_time, normal_rehearsal_order, created_at";

/// Provides create and lookup operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (name, default_changeover_min, start_time, open_time) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.name)
            .bind(input.changeover_or_default())
            .bind(&input.start_time)
            .bind(&input.open_time)
            .fetch_one(pool)
            .await
    }

    /// Find an event by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Remember the rehearsal order used by later template generations.
    pub async fn set_rehearsal_order(
        pool: &PgPool,
        id: DbId,
        order: RehearsalOrder,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET normal_rehearsal_order = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(order.as_str())
            .fetch_optional(pool)
            .await
    }
}
