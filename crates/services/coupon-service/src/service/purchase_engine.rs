//! Purchase and redemption of generated offers.
//!
//! Buying takes a unit of stock and mints an offer in one transaction.
//! The stock decrement is conditional on stock still being positive or
//! unlimited, checked in the same statement that writes it. It
//! runs before the offer insert, so a failed insert never leaves stock taken
//! without an offer. Redemption is a conditional flip of the `redeemed` flag,
//! so concurrent redemptions of one offer cannot both succeed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use common::{AppError, AppResult, OptionExt};
use domain::{generate_offer_code, GeneratedOffer, Role, MAX_OFFER_ID_ATTEMPTS};

use super::auth_guard::{require_role, Claims};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Purchase service trait for dependency injection.
#[async_trait]
pub trait PurchaseService: Send + Sync {
    /// Buy one unit of a coupon. Clients only.
    async fn buy(&self, caller: &Claims, coupon_id: &str) -> AppResult<GeneratedOffer>;

    /// Redeem an offer at the point of sale. Employees of the issuing enterprise only.
    async fn redeem(&self, caller: &Claims, offer_id: &str) -> AppResult<GeneratedOffer>;

    /// Fetch one offer, visible to its owner and to employees of the issuing enterprise.
    async fn view_offer(&self, caller: &Claims, offer_id: &str) -> AppResult<GeneratedOffer>;

    /// List the offers bought by `user_id`.
    async fn list_user_offers(
        &self,
        caller: &Claims,
        user_id: &str,
    ) -> AppResult<Vec<GeneratedOffer>>;
}

/// Concrete implementation of PurchaseService using Unit of Work.
pub struct PurchaseEngine<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PurchaseEngine<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Enterprise the calling employee works for.
    async fn employer_of(&self, caller: &Claims) -> AppResult<String> {
        let employee = self
            .uow
            .accounts()
            .find(Role::Employee, &caller.sub)
            .await?
            .ok_or_not_found("Employee")?;

        employee
            .as_employee()
            .map(|profile| profile.enterprise_id.clone())
            .ok_or_else(|| AppError::internal(format!("Account {} has no employee profile", caller.sub)))
    }

    async fn coupon_owner(&self, coupon_id: &str) -> AppResult<String> {
        let coupon = self
            .uow
            .coupons()
            .find_by_id(coupon_id)
            .await?
            .ok_or_not_found("Coupon")?;
        Ok(coupon.enterprise_id)
    }
}

#[async_trait]
impl<U: UnitOfWork> PurchaseService for PurchaseEngine<U> {
    async fn buy(&self, caller: &Claims, coupon_id: &str) -> AppResult<GeneratedOffer> {
        require_role(caller, Role::Client)?;

        let coupon = self
            .uow
            .coupons()
            .find_by_id(coupon_id)
            .await?
            .ok_or_not_found("Coupon")?;
        coupon.ensure_purchasable()?;

        self.uow
            .accounts()
            .find(Role::Client, &caller.sub)
            .await?
            .ok_or_not_found("Client")?;

        let enterprise_code = self
            .uow
            .accounts()
            .find(Role::Enterprise, &coupon.enterprise_id)
            .await?
            .as_ref()
            .and_then(|account| account.as_enterprise())
            .map(|profile| profile.enterprise_code.clone())
            .ok_or_not_found("Enterprise")?;

        let buyer = caller.sub.clone();
        let now = Utc::now();

        let offer = with_transaction!(self.uow, |ctx| {
            ctx.coupons().reserve_stock(&coupon.id).await?;

            for _ in 0..MAX_OFFER_ID_ATTEMPTS {
                let offer =
                    GeneratedOffer::mint(generate_offer_code(&enterprise_code), &coupon, &buyer, now);
                if ctx.offers().insert_new(offer.clone()).await? {
                    return Ok(offer);
                }
                tracing::debug!(offer_id = %offer.id, "Offer id already taken, drawing another");
            }

            Err(AppError::conflict("Offer id"))
        })?;

        tracing::info!(
            offer_id = %offer.id,
            coupon_id = %offer.coupon_id,
            buyer = %offer.user_id,
            "Coupon purchased"
        );
        Ok(offer)
    }

    async fn redeem(&self, caller: &Claims, offer_id: &str) -> AppResult<GeneratedOffer> {
        require_role(caller, Role::Employee)?;

        let offer = self
            .uow
            .offers()
            .find_by_id(offer_id)
            .await?
            .ok_or_not_found("Offer")?;
        offer.ensure_redeemable(Utc::now())?;

        let employer = self.employer_of(caller).await?;
        if employer != self.coupon_owner(&offer.coupon_id).await? {
            tracing::warn!(offer_id = %offer.id, employee = %caller.sub, "Redemption by foreign employee");
            return Err(AppError::forbidden(
                "you must be an employee of this enterprise to redeem this coupon",
            ));
        }

        if !self.uow.offers().mark_redeemed(&offer.id).await? {
            return Err(AppError::AlreadyRedeemed);
        }

        tracing::info!(offer_id = %offer.id, employee = %caller.sub, "Offer redeemed");
        Ok(GeneratedOffer {
            redeemed: true,
            ..offer
        })
    }

    async fn view_offer(&self, caller: &Claims, offer_id: &str) -> AppResult<GeneratedOffer> {
        let offer = self
            .uow
            .offers()
            .find_by_id(offer_id)
            .await?
            .ok_or_not_found("Offer")?;

        match caller.role {
            Role::Employee => {
                let employer = self.employer_of(caller).await?;
                if employer != self.coupon_owner(&offer.coupon_id).await? {
                    return Err(AppError::forbidden(
                        "you must be an employee of this enterprise to view this offer",
                    ));
                }
            }
            Role::Client => {
                if offer.user_id != caller.sub {
                    return Err(AppError::forbidden(
                        "you must be the owner of this offer to view it",
                    ));
                }
            }
            _ => {
                return Err(AppError::forbidden(
                    "only clients and employees can view offers",
                ));
            }
        }

        Ok(offer)
    }

    async fn list_user_offers(
        &self,
        caller: &Claims,
        user_id: &str,
    ) -> AppResult<Vec<GeneratedOffer>> {
        match caller.role {
            Role::Client if caller.sub == user_id => {}
            Role::Client => {
                return Err(AppError::forbidden(
                    "you can only list your own offers",
                ));
            }
            Role::Administrator => {}
            _ => return Err(AppError::wrong_role(Role::Client)),
        }

        self.uow.offers().list_by_user(user_id).await
    }
}
