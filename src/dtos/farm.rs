use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct UpsertFarmRequest {
    pub name: String,
    pub size_ha: Option<f64>,
    pub primary_crops: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct FarmResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub size_ha: Option<f64>,
    pub primary_crops: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::models::farm::Farm> for FarmResponse {
    fn from(farm: crate::models::farm::Farm) -> Self {
        Self {
            id: farm.id,
            user_id: farm.user_id,
            name: farm.name,
            size_ha: farm.size_ha,
            primary_crops: farm.primary_crops,
            created_at: farm.created_at,
        }
    }
}
