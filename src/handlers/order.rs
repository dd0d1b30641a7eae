use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashMap;
use sqlx::PgPool;
use uuid::Uuid;
use crate::dtos::order::{UpdateOrderStatusRequest, AssignCourierRequest, OrderResponse};
use crate::models::order::OrderStatus;
use crate::state::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;

const ORDER_SELECT: &str =
    "SELECT o.id, o.bid_id, b.product_id, p.title AS product_title, p.photo_url,
            p.farmer_id, f.full_name AS farmer_name, f.region AS farmer_region,
            b.buyer_id, u.full_name AS buyer_name,
            b.price::FLOAT8 AS price, b.qty_kg::FLOAT8 AS qty_kg,
            o.status, o.courier_name, o.courier_phone, o.created_at, o.delivered_at
     FROM orders o
     JOIN bids b ON o.bid_id = b.id
     JOIN products p ON b.product_id = p.id
     JOIN users f ON p.farmer_id = f.id
     JOIN users u ON b.buyer_id = u.id";

// GET /orders - Orders visible to the caller: buyers see their purchases,
// farmers their sales, admins everything. `scope` narrows to active or completed.
pub async fn get_orders(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let scope = params.get("scope").map(|s| s.as_str());
    match scope {
        None | Some("active") | Some("completed") => {}
        Some(_) => return Err(AppError::validation("Invalid scope")),
    }

    let mut query_str = format!("{ORDER_SELECT} WHERE 1=1");

    let scoped_to_user = match auth.role.as_str() {
        "buyer" => {
            query_str.push_str(" AND b.buyer_id = $1");
            true
        }
        "farmer" => {
            query_str.push_str(" AND p.farmer_id = $1");
            true
        }
        "admin" => false,
        _ => return Err(AppError::forbidden("Unknown role")),
    };

    match scope {
        Some("active") => query_str.push_str(" AND o.status IN ('ordered', 'picked-up', 'in-transit')"),
        Some("completed") => query_str.push_str(" AND o.status = 'delivered'"),
        _ => {}
    }

    query_str.push_str(" ORDER BY o.created_at DESC");

    let mut query = sqlx::query_as::<_, OrderRow>(&query_str);
    if scoped_to_user {
        query = query.bind(auth.user_id);
    }

    let orders = query.fetch_all(&db_pool).await?;

    Ok(Json(orders.into_iter().map(OrderRow::into_response).collect()))
}

// POST /orders/{id}/status - Advance an order along the fulfilment pipeline
pub async fn update_order_status(
    Path(id): Path<Uuid>,
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let target = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::validation("Invalid status"))?;

    let order = sqlx::query_as::<_, OrderAccessRow>(
        "SELECT o.status, p.farmer_id
         FROM orders o
         JOIN bids b ON o.bid_id = b.id
         JOIN products p ON b.product_id = p.id
         WHERE o.id = $1"
    )
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Order not found"))?;

    if auth.role != "admin" && order.farmer_id != auth.user_id {
        return Err(AppError::forbidden("Only the listing farmer or an admin can update order status"));
    }

    let current = OrderStatus::parse(&order.status)
        .ok_or_else(|| AppError::internal("Order has an unknown status"))?;
    if !current.can_advance_to(target) {
        return Err(AppError::conflict(format!(
            "Order cannot move from {} to {}",
            current.as_str(),
            target.as_str()
        )));
    }

    // The write only lands if the status is still the one the check ran against
    let updated = sqlx::query(
        "UPDATE orders
         SET status = $2,
             delivered_at = CASE WHEN $2 = 'delivered' THEN now() ELSE delivered_at END
         WHERE id = $1 AND status = $3"
    )
    .bind(id)
    .bind(target.as_str())
    .bind(current.as_str())
    .execute(&db_pool)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::conflict("Order status has changed"));
    }

    fetch_order_by_id(&db_pool, id).await.map(Json)
}

// PUT /orders/{id}/courier - Admin assigns the courier handling delivery
pub async fn assign_courier(
    Path(id): Path<Uuid>,
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<AssignCourierRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    if auth.role != "admin" {
        return Err(AppError::forbidden("Only admins can assign couriers"));
    }
    if payload.courier_name.trim().is_empty() {
        return Err(AppError::validation("Courier name required"));
    }
    if payload.courier_phone.trim().is_empty() {
        return Err(AppError::validation("Courier phone required"));
    }

    let result = sqlx::query("UPDATE orders SET courier_name = $2, courier_phone = $3 WHERE id = $1")
        .bind(id)
        .bind(&payload.courier_name)
        .bind(&payload.courier_phone)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Order not found"));
    }

    fetch_order_by_id(&db_pool, id).await.map(Json)
}

// Helper to fetch one order with its listing and counterparties
async fn fetch_order_by_id(db_pool: &PgPool, id: Uuid) -> Result<OrderResponse, AppError> {
    let order = sqlx::query_as::<_, OrderRow>(&format!("{ORDER_SELECT} WHERE o.id = $1"))
        .bind(id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    Ok(order.into_response())
}

#[derive(sqlx::FromRow)]
struct OrderAccessRow {
    status: String,
    farmer_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    bid_id: Uuid,
    product_id: Uuid,
    product_title: String,
    photo_url: Option<String>,
    farmer_id: Uuid,
    farmer_name: String,
    farmer_region: String,
    buyer_id: Uuid,
    buyer_name: String,
    price: f64,
    qty_kg: f64,
    status: String,
    courier_name: Option<String>,
    courier_phone: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    delivered_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl OrderRow {
    fn into_response(self) -> OrderResponse {
        let total = self.price * self.qty_kg;
        OrderResponse {
            id: self.id,
            bid_id: self.bid_id,
            product_id: self.product_id,
            product_title: self.product_title,
            photo_url: self.photo_url,
            farmer_id: self.farmer_id,
            farmer_name: self.farmer_name,
            farmer_region: self.farmer_region,
            buyer_id: self.buyer_id,
            buyer_name: self.buyer_name,
            price: self.price,
            qty_kg: self.qty_kg,
            total,
            status: self.status,
            courier_name: self.courier_name,
            courier_phone: self.courier_phone,
            created_at: self.created_at,
            delivered_at: self.delivered_at,
        }
    }
}
