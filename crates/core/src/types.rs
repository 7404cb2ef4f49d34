/// All primary keys are PostgreSQL UUIDs (`gen_random_uuid()`).
///
/// Slots may also be created client-side with a fresh v4 UUID and upserted by id.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
