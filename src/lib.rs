pub mod auth;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Builds the full application under the /api base path.
pub fn app(app_state: AppState) -> Router {
    let api = routes::create_router()
        .route("/", get(|| async { "e-Beer API" }))
        .route("/health", get(health_check));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .with_state(app_state)
}

async fn health_check() -> &'static str {
    "OK"
}
