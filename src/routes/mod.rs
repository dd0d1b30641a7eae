pub mod admin;
pub mod analytics;
pub mod bids;
pub mod farms;
pub mod notifications;
pub mod orders;
pub mod payouts;
pub mod products;
pub mod users;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(products::routes())
        .merge(bids::routes())
        .merge(orders::routes())
        .merge(notifications::routes())
        .merge(payouts::routes())
        .merge(analytics::routes())
        .merge(admin::routes())
        .merge(farms::routes())
}
