/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Opaque identity of the actor performing a mutation.
///
/// Issued by the platform gateway after authentication; this service only
/// records it on audit fields and never interprets it.
pub type ActorId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
