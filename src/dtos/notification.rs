use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::models::notification::Notification> for NotificationResponse {
    fn from(n: crate::models::notification::Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            kind: n.kind,
            payload: n.payload,
            read: n.read,
            created_at: n.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub notification_ids: Vec<Uuid>,
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}
