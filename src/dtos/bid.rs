use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct SubmitBidRequest {
    pub product_id: Uuid,
    pub price: f64,
    pub qty_kg: f64,
}

#[derive(Deserialize)]
pub struct RespondBidRequest {
    pub action: String,
}

#[derive(Serialize)]
pub struct BidResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub buyer_id: Uuid,
    pub price: f64,
    pub qty_kg: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::models::bid::Bid> for BidResponse {
    fn from(bid: crate::models::bid::Bid) -> Self {
        Self {
            id: bid.id,
            product_id: bid.product_id,
            buyer_id: bid.buyer_id,
            price: bid.price,
            qty_kg: bid.qty_kg,
            status: bid.status,
            created_at: bid.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct RespondBidResponse {
    pub bid_id: Uuid,
    pub status: String,
    pub order_id: Option<Uuid>,
}

/// A buyer's own bid with the listing it targets.
#[derive(Serialize)]
pub struct BidListItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_title: String,
    pub price: f64,
    pub qty_kg: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A bid on a farmer's listing with the bidder's display name.
#[derive(Serialize)]
pub struct ProductBidItem {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub price: f64,
    pub qty_kg: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
