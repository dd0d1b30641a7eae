use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub bid_id: Uuid,
    pub status: String,
    pub courier_name: Option<String>,
    pub courier_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Fulfilment pipeline: ordered -> picked-up -> in-transit -> delivered.
/// Stages may be skipped but never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Ordered,
    PickedUp,
    InTransit,
    Delivered,
}

impl OrderStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ordered" => Some(OrderStatus::Ordered),
            "picked-up" => Some(OrderStatus::PickedUp),
            "in-transit" => Some(OrderStatus::InTransit),
            "delivered" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ordered",
            OrderStatus::PickedUp => "picked-up",
            OrderStatus::InTransit => "in-transit",
            OrderStatus::Delivered => "delivered",
        }
    }

    fn rank(self) -> u8 {
        match self {
            OrderStatus::Ordered => 0,
            OrderStatus::PickedUp => 1,
            OrderStatus::InTransit => 2,
            OrderStatus::Delivered => 3,
        }
    }

    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        next.rank() > self.rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_forward() {
        assert!(OrderStatus::Ordered.can_advance_to(OrderStatus::PickedUp));
        assert!(OrderStatus::PickedUp.can_advance_to(OrderStatus::InTransit));
        assert!(OrderStatus::InTransit.can_advance_to(OrderStatus::Delivered));
    }

    #[test]
    fn skipping_stages_is_allowed() {
        assert!(OrderStatus::Ordered.can_advance_to(OrderStatus::Delivered));
        assert!(OrderStatus::PickedUp.can_advance_to(OrderStatus::Delivered));
    }

    #[test]
    fn never_moves_backward() {
        assert!(!OrderStatus::InTransit.can_advance_to(OrderStatus::PickedUp));
        assert!(!OrderStatus::Delivered.can_advance_to(OrderStatus::Ordered));
    }

    #[test]
    fn same_stage_is_not_an_advance() {
        assert!(!OrderStatus::Ordered.can_advance_to(OrderStatus::Ordered));
        assert!(!OrderStatus::Delivered.can_advance_to(OrderStatus::Delivered));
    }

    #[test]
    fn parses_hyphenated_stages() {
        assert_eq!(OrderStatus::parse("picked-up"), Some(OrderStatus::PickedUp));
        assert_eq!(OrderStatus::parse("in-transit"), Some(OrderStatus::InTransit));
        assert_eq!(OrderStatus::parse("shipped"), None);
    }
}
