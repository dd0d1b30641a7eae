use serde::Serialize;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Serialize)]
pub struct PayoutResponse {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub amount: f64,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<crate::models::payout::Payout> for PayoutResponse {
    fn from(payout: crate::models::payout::Payout) -> Self {
        Self {
            id: payout.id,
            farmer_id: payout.farmer_id,
            amount: payout.amount,
            status: payout.status,
            requested_at: payout.requested_at,
            paid_at: payout.paid_at,
        }
    }
}
