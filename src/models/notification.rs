use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One feed entry. `kind` is aliased from the `type` column.
#[derive(Debug, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Feed reads are capped to the most recent entries.
pub const FEED_LIMIT: i64 = 50;
