use axum::{
    routing::{get, post, put},
    Router, middleware,
};
use crate::handlers::product::{
    get_products, get_product, get_my_products, create_product, update_product,
    set_product_status, delete_product, get_product_bids,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    // Browsing is open; everything that touches a farmer's own listings is behind auth
    let open = Router::new()
        .route("/products", get(get_products))
        .route("/products/{id}", get(get_product));

    let protected = Router::new()
        .route("/products", post(create_product))
        .route("/products/mine", get(get_my_products))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/status", post(set_product_status))
        .route("/products/{id}/bids", get(get_product_bids))
        .layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
