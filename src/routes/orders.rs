use axum::{Router, routing::{get, post, put}, middleware};
use crate::state::AppState;
use crate::handlers::order::{get_orders, update_order_status, assign_courier};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(get_orders))
        .route("/orders/{id}/status", post(update_order_status))
        .route("/orders/{id}/courier", put(assign_courier))
        .layer(middleware::from_fn(require_auth))
}
