use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct AssignCourierRequest {
    pub courier_name: String,
    pub courier_phone: String,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub bid_id: Uuid,
    pub product_id: Uuid,
    pub product_title: String,
    pub photo_url: Option<String>,
    pub farmer_id: Uuid,
    pub farmer_name: String,
    pub farmer_region: String,
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub price: f64,
    pub qty_kg: f64,
    pub total: f64,
    pub status: String,
    pub courier_name: Option<String>,
    pub courier_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}
