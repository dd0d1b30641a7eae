use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub qty_kg: f64,
    pub unit: String,
    pub min_price: f64,
    pub location: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub organic: bool,
    pub photo_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Listing lifecycle. Farmers toggle between `Active` and `Paused`;
/// `Sold` is only ever set by bid acceptance and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Paused,
    Sold,
}

impl ProductStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ProductStatus::Active),
            "paused" => Some(ProductStatus::Paused),
            "sold" => Some(ProductStatus::Sold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Paused => "paused",
            ProductStatus::Sold => "sold",
        }
    }

    /// Whether a farmer may manually move a listing from `self` to `to`.
    pub fn manual_change_allowed(self, to: ProductStatus) -> bool {
        if self == ProductStatus::Sold {
            return false;
        }
        matches!(to, ProductStatus::Active | ProductStatus::Paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(ProductStatus::parse("active"), Some(ProductStatus::Active));
        assert_eq!(ProductStatus::parse("paused"), Some(ProductStatus::Paused));
        assert_eq!(ProductStatus::parse("sold"), Some(ProductStatus::Sold));
        assert_eq!(ProductStatus::parse("archived"), None);
    }

    #[test]
    fn farmer_can_pause_and_resume() {
        assert!(ProductStatus::Active.manual_change_allowed(ProductStatus::Paused));
        assert!(ProductStatus::Paused.manual_change_allowed(ProductStatus::Active));
    }

    #[test]
    fn sold_is_terminal() {
        assert!(!ProductStatus::Sold.manual_change_allowed(ProductStatus::Active));
        assert!(!ProductStatus::Sold.manual_change_allowed(ProductStatus::Paused));
    }

    #[test]
    fn sold_cannot_be_set_manually() {
        assert!(!ProductStatus::Active.manual_change_allowed(ProductStatus::Sold));
        assert!(!ProductStatus::Paused.manual_change_allowed(ProductStatus::Sold));
    }
}
