//! SeaORM entities.

pub mod account;
pub mod coupon;
pub mod generated_offer;
