use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct Bid {
    pub id: Uuid,
    pub product_id: Uuid,
    pub buyer_id: Uuid,
    pub price: f64,
    pub qty_kg: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BidStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BidStatus::Pending),
            "accepted" => Some(BidStatus::Accepted),
            "rejected" => Some(BidStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
        }
    }
}

/// Price floor check. A bid exactly at the minimum is accepted.
pub fn meets_minimum(price: f64, min_price: f64) -> bool {
    price >= min_price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_at_minimum_is_accepted() {
        assert!(meets_minimum(120.0, 120.0));
    }

    #[test]
    fn bid_above_minimum_is_accepted() {
        assert!(meets_minimum(120.01, 120.0));
    }

    #[test]
    fn bid_below_minimum_is_rejected() {
        assert!(!meets_minimum(119.99, 120.0));
    }

    #[test]
    fn parses_known_statuses() {
        assert_eq!(BidStatus::parse("pending"), Some(BidStatus::Pending));
        assert_eq!(BidStatus::parse("accepted"), Some(BidStatus::Accepted));
        assert_eq!(BidStatus::parse("rejected"), Some(BidStatus::Rejected));
        assert_eq!(BidStatus::parse("maybe"), None);
    }
}
