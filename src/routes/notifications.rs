use axum::{Router, routing::{get, put}, middleware};
use crate::state::AppState;
use crate::handlers::notification::{get_notifications, mark_notifications_read};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(get_notifications))
        .route("/notifications/read", put(mark_notifications_read))
        .layer(middleware::from_fn(require_auth))
}
