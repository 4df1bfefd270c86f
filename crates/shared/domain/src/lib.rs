//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! coupons and their stock rules, generated offers and their redemption rules,
//! and the marketplace accounts that own and use them.

pub mod account;
pub mod constants;
pub mod coupon;
pub mod error;
pub mod offer;
pub mod password;

pub use account::{
    Account, AccountResponse, AdministratorProfile, ClientProfile, EmployeeProfile,
    EnterpriseProfile, EnterpriseSummary, NewAccount, Profile, Role,
};
pub use constants::*;
pub use coupon::{Coupon, CouponDraft, CouponPage};
pub use error::{DomainError, DomainResult};
pub use offer::{generate_offer_code, offer_code, GeneratedOffer};
pub use password::Password;
