//! Application services layer - Use cases and business logic.
//!
//! Services depend on the [`UnitOfWork`](crate::infra::UnitOfWork) abstraction
//! for repository access and transactions.

mod account_service;
mod auth_guard;
mod coupon_inventory;
mod purchase_engine;

pub use account_service::{AccountManager, AccountService, Credentials};
pub use auth_guard::{require_role, AuthGuard, Claims, JwtGuard, TokenResponse};
pub use coupon_inventory::{CouponCatalog, CouponDetail, CouponInventory};
pub use purchase_engine::{PurchaseEngine, PurchaseService};
