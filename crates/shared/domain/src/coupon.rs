//! Coupon domain entity and inventory rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_TITLE_LENGTH, UNLIMITED_STOCK};
use crate::error::{DomainError, DomainResult};

/// Sellable offer definition published by an enterprise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub title: String,
    pub regular_price: f64,
    pub offer_price: f64,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    /// Remaining stock, `-1` for unlimited
    pub available_coupons: i32,
    pub offer_desc: String,
    pub category: String,
    /// Email of the owning enterprise
    pub enterprise_id: String,
}

impl Coupon {
    pub fn is_unlimited(&self) -> bool {
        self.available_coupons == UNLIMITED_STOCK
    }

    /// Fail with `SoldOut` when no stock is left. Unlimited stock always passes.
    pub fn ensure_purchasable(&self) -> DomainResult<()> {
        if self.is_unlimited() || self.available_coupons > 0 {
            Ok(())
        } else {
            Err(DomainError::SoldOut)
        }
    }
}

/// Coupon fields supplied by a publisher on create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponDraft {
    pub title: String,
    pub regular_price: f64,
    pub offer_price: f64,
    /// Defaults to the time of the write
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: DateTime<Utc>,
    pub available_coupons: i32,
    pub offer_desc: String,
    pub category: String,
}

impl CouponDraft {
    /// Validate the draft and turn it into a coupon owned by `enterprise_id`.
    pub fn into_coupon(
        self,
        id: String,
        enterprise_id: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Coupon> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Title is required"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LENGTH
            )));
        }
        if self.offer_desc.trim().is_empty() {
            return Err(DomainError::validation("Offer description is required"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("Category is required"));
        }
        check_price("Regular price", self.regular_price)?;
        check_price("Offer price", self.offer_price)?;

        if self.available_coupons == 0 {
            return Err(DomainError::validation(
                "Available coupons must be positive or -1 for unlimited",
            ));
        }
        if self.available_coupons < UNLIMITED_STOCK {
            return Err(DomainError::validation(
                "Available coupons cannot be negative except -1 for unlimited",
            ));
        }

        let valid_from = self.valid_from.unwrap_or(now);
        if self.valid_until <= valid_from {
            return Err(DomainError::validation(
                "Expiration date must be after the start date",
            ));
        }
        if self.valid_until <= now {
            return Err(DomainError::validation(
                "Expiration date must be in the future",
            ));
        }

        Ok(Coupon {
            id,
            title: title.to_string(),
            regular_price: self.regular_price,
            offer_price: self.offer_price,
            valid_from,
            valid_until: self.valid_until,
            available_coupons: self.available_coupons,
            offer_desc: self.offer_desc,
            category: self.category,
            enterprise_id,
        })
    }
}

fn check_price(field: &str, value: f64) -> DomainResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "{} must be zero or greater",
            field
        )))
    }
}

/// One page of the coupon listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CouponPage {
    pub coupons: Vec<Coupon>,
    /// Id of the last coupon on this page when more pages follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}
