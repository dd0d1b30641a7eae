use serde::Serialize;

#[derive(Serialize)]
pub struct FarmerAnalyticsResponse {
    pub total_earnings: f64,
    pub active_listings: i64,
    pub pending_orders: i64,
}

#[derive(Serialize)]
pub struct AdminAnalyticsResponse {
    pub total_revenue: f64,
    pub active_users: i64,
    pub total_listings: i64,
    pub deliveries_in_progress: i64,
}
