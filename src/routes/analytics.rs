use axum::{Router, routing::get, middleware};
use crate::state::AppState;
use crate::handlers::analytics::{get_farmer_analytics, get_admin_analytics};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/farmer", get(get_farmer_analytics))
        .route("/analytics/admin", get(get_admin_analytics))
        .layer(middleware::from_fn(require_auth))
}
