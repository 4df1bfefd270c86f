//! Repository layer for data access.

mod account_repository;
mod coupon_repository;
pub mod entities;
mod offer_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use coupon_repository::{CouponRepository, CouponStore};
pub use offer_repository::{OfferRepository, OfferStore};

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use coupon_repository::MockCouponRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use offer_repository::MockOfferRepository;
