use axum::{extract::State, Json};
use crate::dtos::analytics::{FarmerAnalyticsResponse, AdminAnalyticsResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;

// GET /analytics/farmer - Computed live from orders and listings
pub async fn get_farmer_analytics(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<FarmerAnalyticsResponse>, AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers can view farmer analytics"));
    }

    let total_earnings = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(b.price * b.qty_kg), 0)::FLOAT8
         FROM orders o
         JOIN bids b ON o.bid_id = b.id
         JOIN products p ON b.product_id = p.id
         WHERE p.farmer_id = $1 AND o.status = 'delivered'"
    )
    .bind(auth.user_id)
    .fetch_one(&db_pool)
    .await?;

    let active_listings = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM products WHERE farmer_id = $1 AND status = 'active'"
    )
    .bind(auth.user_id)
    .fetch_one(&db_pool)
    .await?;

    let pending_orders = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)
         FROM orders o
         JOIN bids b ON o.bid_id = b.id
         JOIN products p ON b.product_id = p.id
         WHERE p.farmer_id = $1 AND o.status <> 'delivered'"
    )
    .bind(auth.user_id)
    .fetch_one(&db_pool)
    .await?;

    Ok(Json(FarmerAnalyticsResponse {
        total_earnings,
        active_listings,
        pending_orders,
    }))
}

// GET /analytics/admin - Marketplace-wide figures
pub async fn get_admin_analytics(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<AdminAnalyticsResponse>, AppError> {
    if auth.role != "admin" {
        return Err(AppError::forbidden("Only admins can view admin analytics"));
    }

    let total_revenue = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(b.price * b.qty_kg), 0)::FLOAT8
         FROM orders o
         JOIN bids b ON o.bid_id = b.id"
    )
    .fetch_one(&db_pool)
    .await?;

    let active_users = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE status = 'active'"
    )
    .fetch_one(&db_pool)
    .await?;

    let total_listings = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM products WHERE status = 'active'"
    )
    .fetch_one(&db_pool)
    .await?;

    let deliveries_in_progress = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM orders WHERE status IN ('picked-up', 'in-transit')"
    )
    .fetch_one(&db_pool)
    .await?;

    Ok(Json(AdminAnalyticsResponse {
        total_revenue,
        active_users,
        total_listings,
        deliveries_in_progress,
    }))
}
