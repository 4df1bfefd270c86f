//! HTTP request handlers.

pub mod account_handler;
pub mod coupon_handler;
pub mod offer_handler;

pub use account_handler::{account_routes, protected_account_routes};
pub use coupon_handler::{coupon_routes, protected_coupon_routes};
pub use offer_handler::offer_routes;
