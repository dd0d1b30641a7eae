use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use crate::dtos::bid::{
    SubmitBidRequest, RespondBidRequest, BidResponse, RespondBidResponse, BidListItem,
};
use crate::models::bid::{meets_minimum, Bid, BidStatus};
use crate::state::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::handlers::notification::push_notification;
use axum::extract::Extension;
use tracing::{instrument, warn};

const BID_COLUMNS: &str =
    "id, product_id, buyer_id, price::FLOAT8 AS price, qty_kg::FLOAT8 AS qty_kg, status, created_at";

// POST /bids - Place a bid on an active listing
#[instrument(skip(state, payload))]
pub async fn submit_bid(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<SubmitBidRequest>,
) -> Result<(StatusCode, Json<BidResponse>), AppError> {
    if auth.role != "buyer" {
        return Err(AppError::forbidden("Only buyers can place bids"));
    }
    if payload.price <= 0.0 {
        return Err(AppError::validation("Price must be greater than 0"));
    }
    if payload.qty_kg <= 0.0 {
        return Err(AppError::validation("Quantity must be greater than 0"));
    }

    let product = sqlx::query_as::<_, BidTargetRow>(
        "SELECT farmer_id, title, min_price::FLOAT8 AS min_price
         FROM products
         WHERE id = $1 AND status = 'active'"
    )
    .bind(payload.product_id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found or not active"))?;

    if !meets_minimum(payload.price, product.min_price) {
        return Err(AppError::validation("Bid price below minimum"));
    }

    let bid = sqlx::query_as::<_, Bid>(&format!(
        "INSERT INTO bids (product_id, buyer_id, price, qty_kg)
         VALUES ($1, $2, $3::FLOAT8, $4::FLOAT8)
         RETURNING {BID_COLUMNS}"
    ))
    .bind(payload.product_id)
    .bind(auth.user_id)
    .bind(payload.price)
    .bind(payload.qty_kg)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23503") {
                return AppError::validation("Invalid product_id");
            }
        }
        AppError::db(e)
    })?;

    // Feed write is best-effort; the bid stands either way
    let note = json!({
        "bid_id": bid.id,
        "product_title": product.title,
        "price": bid.price,
        "qty_kg": bid.qty_kg,
    });
    if let Err(e) = push_notification(&state.db_pool, product.farmer_id, "bid", note).await {
        warn!(?e, "Failed to write bid notification");
    }

    Ok((StatusCode::CREATED, Json(BidResponse::from(bid))))
}

// POST /bids/{id}/respond - Accept or reject a pending bid on own listing
#[instrument(skip(state, payload), fields(id))]
pub async fn respond_bid(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<RespondBidRequest>,
) -> Result<Json<RespondBidResponse>, AppError> {
    let decision = match payload.action.as_str() {
        "accept" => BidStatus::Accepted,
        "reject" => BidStatus::Rejected,
        _ => return Err(AppError::validation("Invalid action")),
    };

    let bid = sqlx::query_as::<_, BidWithListingRow>(
        "SELECT b.id, b.product_id, b.buyer_id, b.price::FLOAT8 AS price,
                p.farmer_id, p.title AS product_title
         FROM bids b
         JOIN products p ON b.product_id = p.id
         WHERE b.id = $1 AND b.status = 'pending'"
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Bid not found"))?;

    if bid.farmer_id != auth.user_id {
        return Err(AppError::forbidden("Not authorized to respond to this bid"));
    }

    // Decision, order creation and listing close land together or not at all
    let mut tx = state.db_pool.begin().await?;

    let updated = sqlx::query("UPDATE bids SET status = $2 WHERE id = $1 AND status = 'pending'")
        .bind(id)
        .bind(decision.as_str())
        .execute(&mut *tx)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::conflict("Bid is no longer pending"));
    }

    let mut order_id = None;
    if decision == BidStatus::Accepted {
        let oid = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO orders (bid_id) VALUES ($1) RETURNING id"
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::conflict("Order already exists for this bid");
                }
            }
            AppError::db(e)
        })?;

        sqlx::query("UPDATE products SET status = 'sold' WHERE id = $1")
            .bind(bid.product_id)
            .execute(&mut *tx)
            .await?;

        // Remaining pending bids on the listing are closed out
        sqlx::query(
            "UPDATE bids SET status = 'rejected'
             WHERE product_id = $1 AND status = 'pending' AND id <> $2"
        )
        .bind(bid.product_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        order_id = Some(oid);
    }

    tx.commit().await?;

    let note = json!({
        "bid_id": bid.id,
        "product_title": bid.product_title,
        "status": decision.as_str(),
        "price": bid.price,
    });
    if let Err(e) = push_notification(&state.db_pool, bid.buyer_id, "bid", note).await {
        warn!(?e, "Failed to write bid response notification");
    }

    Ok(Json(RespondBidResponse {
        bid_id: bid.id,
        status: decision.as_str().to_string(),
        order_id,
    }))
}

// GET /bids/mine - The calling buyer's bids, newest first
pub async fn get_my_bids(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<BidListItem>>, AppError> {
    if auth.role != "buyer" {
        return Err(AppError::forbidden("Only buyers have bids"));
    }

    let bids = sqlx::query_as::<_, (Uuid, Uuid, String, f64, f64, String, chrono::DateTime<chrono::Utc>)>(
        "SELECT b.id, b.product_id, p.title, b.price::FLOAT8, b.qty_kg::FLOAT8, b.status, b.created_at
         FROM bids b
         JOIN products p ON b.product_id = p.id
         WHERE b.buyer_id = $1
         ORDER BY b.created_at DESC"
    )
    .bind(auth.user_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        bids.into_iter()
            .map(|(id, product_id, product_title, price, qty_kg, status, created_at)| BidListItem {
                id,
                product_id,
                product_title,
                price,
                qty_kg,
                status,
                created_at,
            })
            .collect(),
    ))
}

#[derive(sqlx::FromRow)]
struct BidTargetRow {
    farmer_id: Uuid,
    title: String,
    min_price: f64,
}

#[derive(sqlx::FromRow)]
struct BidWithListingRow {
    id: Uuid,
    product_id: Uuid,
    buyer_id: Uuid,
    price: f64,
    farmer_id: Uuid,
    product_title: String,
}
