pub mod bid;
pub mod farm;
pub mod notification;
pub mod order;
pub mod payout;
pub mod product;
pub mod user;
