use axum::{Router, routing::get, middleware};
use crate::state::AppState;
use crate::handlers::farm::{get_farm, upsert_farm};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/farm", get(get_farm).put(upsert_farm))
        .layer(middleware::from_fn(require_auth))
}
