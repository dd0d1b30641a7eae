use axum::{Router, routing::{get, post}, middleware};
use crate::state::AppState;
use crate::handlers::bid::{submit_bid, respond_bid, get_my_bids};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bids", post(submit_bid))
        .route("/bids/mine", get(get_my_bids))
        .route("/bids/{id}/respond", post(respond_bid))
        .layer(middleware::from_fn(require_auth))
}
