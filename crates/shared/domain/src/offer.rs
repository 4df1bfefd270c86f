//! Generated offers: purchased, redeemable coupon instances.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::OFFER_SUFFIX_UPPER_BOUND;
use crate::coupon::Coupon;
use crate::error::{DomainError, DomainResult};

/// A coupon bought by a client. Redeemable once, until it expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GeneratedOffer {
    /// Enterprise code followed by a random number, e.g. `ATONIOSFOODS4821337`
    pub id: String,
    pub coupon_id: String,
    /// Email of the buying client
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub redeemed: bool,
}

impl GeneratedOffer {
    /// Mint a fresh, unredeemed offer for `buyer`. Expiry is copied from the coupon.
    pub fn mint(id: String, coupon: &Coupon, buyer: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            coupon_id: coupon.id.clone(),
            user_id: buyer.to_string(),
            generated_at: now,
            expiration_date: coupon.valid_until,
            redeemed: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date < now
    }

    /// Expiry is checked before the redeemed flag.
    pub fn ensure_redeemable(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.is_expired(now) {
            return Err(DomainError::OfferExpired);
        }
        if self.redeemed {
            return Err(DomainError::AlreadyRedeemed);
        }
        Ok(())
    }
}

/// Build an offer id from an enterprise code and a numeric suffix.
pub fn offer_code(enterprise_code: &str, suffix: u32) -> String {
    format!("{}{}", enterprise_code, suffix)
}

/// Draw a fresh offer id for `enterprise_code` from the OS random source.
pub fn generate_offer_code(enterprise_code: &str) -> String {
    offer_code(enterprise_code, random_suffix(&mut OsRng))
}

/// Uniform draw in `[0, OFFER_SUFFIX_UPPER_BOUND)`.
fn random_suffix<R: RngCore>(rng: &mut R) -> u32 {
    let zone = (u32::MAX / OFFER_SUFFIX_UPPER_BOUND) * OFFER_SUFFIX_UPPER_BOUND;
    loop {
        let candidate = rng.next_u32();
        if candidate < zone {
            return candidate % OFFER_SUFFIX_UPPER_BOUND;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn offer(expires_in: Duration, redeemed: bool) -> GeneratedOffer {
        let now = Utc::now();
        GeneratedOffer {
            id: "ATONIOSFOODS42".to_string(),
            coupon_id: "c1".to_string(),
            user_id: "client@example.com".to_string(),
            generated_at: now,
            expiration_date: now + expires_in,
            redeemed,
        }
    }

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..200 {
            let code = generate_offer_code("ATONIOSFOODS");
            let digits = code.strip_prefix("ATONIOSFOODS").unwrap();
            assert!((1..=7).contains(&digits.len()));
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
            assert!(digits.parse::<u32>().unwrap() < OFFER_SUFFIX_UPPER_BOUND);
        }
    }

    #[test]
    fn test_offer_code_has_no_padding() {
        assert_eq!(offer_code("ABC", 7), "ABC7");
        assert_eq!(offer_code("ABC", 0), "ABC0");
    }

    #[test]
    fn test_redeemable_when_fresh() {
        assert!(offer(Duration::days(1), false)
            .ensure_redeemable(Utc::now())
            .is_ok());
    }

    #[test]
    fn test_expired_wins_over_redeemed() {
        let stale = offer(Duration::days(-1), true);
        assert_eq!(
            stale.ensure_redeemable(Utc::now()),
            Err(DomainError::OfferExpired)
        );
    }

    #[test]
    fn test_already_redeemed() {
        let used = offer(Duration::days(1), true);
        assert_eq!(
            used.ensure_redeemable(Utc::now()),
            Err(DomainError::AlreadyRedeemed)
        );
    }
}
