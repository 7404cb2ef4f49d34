//! Repository for the `slot_staff_assignments` table.

use gigboard_core::staffing::NewAssignment;
use gigboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{CreateSlotStaffAssignment, SlotStaffAssignment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_slot_id, person_id, role, is_fixed, note, created_at";

/// Same columns qualified with the `a` alias, for joins against `event_slots`.
const JOINED_COLUMNS: &str =
    "a.id, a.event_slot_id, a.person_id, a.role, a.is_fixed, a.note, a.created_at";

/// Provides persistence for per-slot staff assignments.
pub struct SlotStaffAssignmentRepo;

impl SlotStaffAssignmentRepo {
    /// List the assignments of every slot in an event, in running order.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<SlotStaffAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM slot_staff_assignments a \
             JOIN event_slots s ON s.id = a.event_slot_id \
             WHERE s.event_id = $1 \
             ORDER BY s.order_in_event ASC NULLS LAST, a.role ASC, a.created_at ASC"
        );
        sqlx::query_as::<_, SlotStaffAssignment>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// List the assignments on any of the given slots.
    pub async fn list_by_slots(
        pool: &PgPool,
        slot_ids: &[DbId],
    ) -> Result<Vec<SlotStaffAssignment>, sqlx::Error> {
        if slot_ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM slot_staff_assignments \
             WHERE event_slot_id = ANY($1) \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, SlotStaffAssignment>(&query)
            .bind(slot_ids)
            .fetch_all(pool)
            .await
    }

    /// Insert a single assignment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSlotStaffAssignment,
    ) -> Result<SlotStaffAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO slot_staff_assignments (event_slot_id, person_id, role, is_fixed, note) \
             VALUES ($1, $2, $3, COALESCE($4, false), $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SlotStaffAssignment>(&query)
            .bind(input.event_slot_id)
            .bind(input.person_id)
            .bind(input.role.as_str())
            .bind(input.is_fixed)
            .bind(&input.note)
            .fetch_one(pool)
            .await
    }

    /// Insert a batch of planned assignments in a single statement.
    pub async fn create_batch(
        pool: &PgPool,
        batch: &[NewAssignment],
    ) -> Result<Vec<SlotStaffAssignment>, sqlx::Error> {
        if batch.is_empty() {
            return Ok(vec![]);
        }

        let slot_ids: Vec<DbId> = batch.iter().map(|a| a.event_slot_id).collect();
        let person_ids: Vec<DbId> = batch.iter().map(|a| a.person_id).collect();
        let roles: Vec<String> = batch.iter().map(|a| a.role.as_str().to_string()).collect();
        let fixed: Vec<bool> = batch.iter().map(|a| a.is_fixed).collect();

        let query = format!(
            "INSERT INTO slot_staff_assignments (event_slot_id, person_id, role, is_fixed) \
             SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::boolean[]) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SlotStaffAssignment>(&query)
            .bind(&slot_ids)
            .bind(&person_ids)
            .bind(&roles)
            .bind(&fixed)
            .fetch_all(pool)
            .await
    }

    /// Delete an assignment, provided its slot belongs to `event_id`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, event_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM slot_staff_assignments a \
             USING event_slots s \
             WHERE a.id = $1 AND s.id = a.event_slot_id AND s.event_id = $2",
        )
        .bind(id)
        .bind(event_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
