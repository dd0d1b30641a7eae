use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct Farm {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub size_ha: Option<f64>,
    pub primary_crops: Vec<String>,
    pub created_at: DateTime<Utc>,
}
