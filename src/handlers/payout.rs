use axum::{extract::State, http::StatusCode, Json};
use crate::dtos::payout::PayoutResponse;
use crate::models::payout::Payout;
use crate::state::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use axum::extract::Extension;

const PAYOUT_COLUMNS: &str =
    "id, farmer_id, amount::FLOAT8 AS amount, status, requested_at, paid_at";

// POST /payouts/request - Request a payout over all delivered orders
pub async fn request_payout(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<(StatusCode, Json<PayoutResponse>), AppError> {
    if auth.role != "farmer" {
        return Err(AppError::forbidden("Only farmers can request payouts"));
    }

    let amount = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(b.price * b.qty_kg), 0)::FLOAT8
         FROM orders o
         JOIN bids b ON o.bid_id = b.id
         JOIN products p ON b.product_id = p.id
         WHERE p.farmer_id = $1 AND o.status = 'delivered'"
    )
    .bind(auth.user_id)
    .fetch_one(&db_pool)
    .await?;

    if amount <= 0.0 {
        return Err(AppError::validation("No delivered orders to payout"));
    }

    let payout = sqlx::query_as::<_, Payout>(&format!(
        "INSERT INTO payouts (farmer_id, amount)
         VALUES ($1, $2::FLOAT8)
         RETURNING {PAYOUT_COLUMNS}"
    ))
    .bind(auth.user_id)
    .bind(amount)
    .fetch_one(&db_pool)
    .await?;

    Ok((StatusCode::CREATED, Json(PayoutResponse::from(payout))))
}

// GET /payouts - Farmers see their own requests, admins see all
pub async fn get_payouts(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<PayoutResponse>>, AppError> {
    let payouts = match auth.role.as_str() {
        "admin" => {
            sqlx::query_as::<_, Payout>(&format!(
                "SELECT {PAYOUT_COLUMNS} FROM payouts ORDER BY requested_at DESC"
            ))
            .fetch_all(&db_pool)
            .await?
        }
        "farmer" => {
            sqlx::query_as::<_, Payout>(&format!(
                "SELECT {PAYOUT_COLUMNS} FROM payouts WHERE farmer_id = $1 ORDER BY requested_at DESC"
            ))
            .bind(auth.user_id)
            .fetch_all(&db_pool)
            .await?
        }
        _ => return Err(AppError::forbidden("Payouts are for farmers and admins")),
    };

    Ok(Json(payouts.into_iter().map(PayoutResponse::from).collect()))
}
