use axum::{Router, routing::{get, put}, middleware};
use crate::state::AppState;
use crate::handlers::admin::{get_users, set_user_status};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(get_users))
        .route("/admin/users/{id}/status", put(set_user_status))
        .layer(middleware::from_fn(require_auth))
}
