use axum::{Router, routing::{get, post}, middleware};
use crate::state::AppState;
use crate::handlers::payout::{request_payout, get_payouts};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payouts", get(get_payouts))
        .route("/payouts/request", post(request_payout))
        .layer(middleware::from_fn(require_auth))
}
