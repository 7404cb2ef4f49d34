//! Repository for the `event_slots` table.
//!
//! Slots are written either one at a time (manual add), as an upsert of the
//! whole edited timetable (save), or as a destructive replace of everything
//! the event has (generation). The latter two run in one transaction.

use gigboard_core::clock::ClockTime;
use gigboard_core::timetable::{Slot, SlotPlan};
use gigboard_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::event_slot::EventSlot;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_id, band_id, slot_type, slot_phase, order_in_event, start_time, \
                       end_time, changeover_min, note, created_at";

/// Running order as stored. Callers re-sort with `compare_slots` for the exact tie-breaks.
const ORDER_BY: &str = "order_in_event ASC NULLS LAST, start_time ASC NULLS FIRST, note ASC";

fn time_text(time: Option<ClockTime>) -> Option<String> {
    time.map(|t| t.to_string())
}

/// Provides persistence for timetable slots.
pub struct EventSlotRepo;

impl EventSlotRepo {
    /// List an event's slots in running order.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<EventSlot>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM event_slots WHERE event_id = $1 ORDER BY {ORDER_BY}");
        sqlx::query_as::<_, EventSlot>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Find a slot by ID, scoped to its event.
    pub async fn find_by_id(
        pool: &PgPool,
        event_id: DbId,
        id: DbId,
    ) -> Result<Option<EventSlot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_slots WHERE id = $1 AND event_id = $2");
        sqlx::query_as::<_, EventSlot>(&query)
            .bind(id)
            .bind(event_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a single slot, keeping the caller-supplied id.
    pub async fn create(pool: &PgPool, event_id: DbId, slot: &Slot) -> Result<EventSlot, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_slots \
                (id, event_id, band_id, slot_type, slot_phase, order_in_event, start_time, \
                 end_time, changeover_min, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventSlot>(&query)
            .bind(slot.id)
            .bind(event_id)
            .bind(slot.band_id)
            .bind(slot.slot_type.as_str())
            .bind(slot.slot_phase.as_str())
            .bind(slot.order_in_event)
            .bind(time_text(slot.start_time))
            .bind(time_text(slot.end_time))
            .bind(slot.changeover_min)
            .bind(&slot.note)
            .fetch_one(pool)
            .await
    }

    /// Delete one slot of an event. Its assignments go with it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, event_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM event_slots WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every slot of an event. Returns the number of rows removed.
    ///
    /// Takes any executor so it can run inside a caller's transaction.
    pub async fn delete_by_event<'e, E>(executor: E, event_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM event_slots WHERE event_id = $1")
            .bind(event_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Insert or update every given slot by id, in one transaction.
    ///
    /// An id that already belongs to another event is not taken over: the
    /// conflicting update matches no row and the whole batch fails with
    /// `RowNotFound`.
    pub async fn upsert_batch(
        pool: &PgPool,
        event_id: DbId,
        slots: &[Slot],
    ) -> Result<Vec<EventSlot>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(slots.len());

        let query = format!(
            "INSERT INTO event_slots \
                (id, event_id, band_id, slot_type, slot_phase, order_in_event, start_time, \
                 end_time, changeover_min, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO UPDATE SET \
                band_id = EXCLUDED.band_id, \
                slot_type = EXCLUDED.slot_type, \
                slot_phase = EXCLUDED.slot_phase, \
                order_in_event = EXCLUDED.order_in_event, \
                start_time = EXCLUDED.start_time, \
                end_time = EXCLUDED.end_time, \
                changeover_min = EXCLUDED.changeover_min, \
                note = EXCLUDED.note \
             WHERE event_slots.event_id = EXCLUDED.event_id \
             RETURNING {COLUMNS}"
        );

        for slot in slots {
            let row = sqlx::query_as::<_, EventSlot>(&query)
                .bind(slot.id)
                .bind(event_id)
                .bind(slot.band_id)
                .bind(slot.slot_type.as_str())
                .bind(slot.slot_phase.as_str())
                .bind(slot.order_in_event)
                .bind(time_text(slot.start_time))
                .bind(time_text(slot.end_time))
                .bind(slot.changeover_min)
                .bind(&slot.note)
                .fetch_one(&mut *tx)
                .await?;
            results.push(row);
        }

        tx.commit().await?;
        Ok(results)
    }

    /// Replace all of an event's slots with a freshly generated set.
    ///
    /// The delete and the inserts share one transaction: if anything fails
    /// the previous timetable is left untouched.
    pub async fn replace_for_event(
        pool: &PgPool,
        event_id: DbId,
        plans: &[SlotPlan],
    ) -> Result<Vec<EventSlot>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = Self::delete_by_event(&mut *tx, event_id).await?;

        let query = format!(
            "INSERT INTO event_slots \
                (event_id, band_id, slot_type, slot_phase, order_in_event, start_time, \
                 end_time, changeover_min, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );

        let mut results = Vec::with_capacity(plans.len());
        for plan in plans {
            let row = sqlx::query_as::<_, EventSlot>(&query)
                .bind(event_id)
                .bind(plan.band_id)
                .bind(plan.slot_type.as_str())
                .bind(plan.slot_phase.as_str())
                .bind(plan.order_in_event)
                .bind(time_text(plan.start_time))
                .bind(time_text(plan.end_time))
                .bind(plan.changeover_min)
                .bind(&plan.note)
                .fetch_one(&mut *tx)
                .await?;
            results.push(row);
        }

        tx.commit().await?;
        tracing::debug!(%event_id, removed, inserted = results.len(), "Replaced event slots");
        Ok(results)
    }
}
