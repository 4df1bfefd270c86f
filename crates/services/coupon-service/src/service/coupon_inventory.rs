//! Coupon inventory - publishing and browsing coupons.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Coupon, CouponDraft, CouponPage, DomainError, EnterpriseSummary, Role};

use super::auth_guard::Claims;
use crate::infra::UnitOfWork;

/// Coupon together with the public details of its enterprise.
#[derive(Debug, Clone)]
pub struct CouponDetail {
    pub coupon: Coupon,
    pub enterprise: EnterpriseSummary,
}

/// Coupon inventory trait for dependency injection.
#[async_trait]
pub trait CouponInventory: Send + Sync {
    /// List coupons ten at a time. A blank token starts from the beginning.
    async fn list_all(&self, next: Option<String>) -> AppResult<CouponPage>;

    async fn list_by_category(&self, category: &str) -> AppResult<Vec<Coupon>>;

    async fn get(&self, id: &str) -> AppResult<Coupon>;

    async fn get_with_enterprise(&self, id: &str) -> AppResult<CouponDetail>;

    /// Publish a new coupon with a server-generated id.
    ///
    /// Enterprises publish for themselves. Administrators name the owner
    /// through `enterprise_id`.
    async fn create(
        &self,
        caller: &Claims,
        draft: CouponDraft,
        enterprise_id: Option<String>,
    ) -> AppResult<Coupon>;

    /// Overwrite (or create) the coupon at `path_id`.
    ///
    /// `body_id` must equal `path_id`. Nothing is written otherwise.
    async fn update(
        &self,
        caller: &Claims,
        path_id: &str,
        body_id: &str,
        draft: CouponDraft,
        enterprise_id: Option<String>,
    ) -> AppResult<Coupon>;
}

/// Concrete implementation of CouponInventory using Unit of Work.
pub struct CouponCatalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CouponCatalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Work out which enterprise will own a coupon written by `caller`.
    async fn resolve_owner(
        &self,
        caller: &Claims,
        requested: Option<String>,
    ) -> AppResult<String> {
        match caller.role {
            Role::Enterprise => Ok(caller.sub.clone()),
            Role::Administrator => {
                let enterprise_id = requested
                    .map(|id| id.trim().to_lowercase())
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| {
                        AppError::validation("enterpriseId is required when publishing as administrator")
                    })?;
                self.uow
                    .accounts()
                    .find(Role::Enterprise, &enterprise_id)
                    .await?
                    .ok_or_not_found("Enterprise")?;
                Ok(enterprise_id)
            }
            _ => {
                tracing::warn!(subject = %caller.sub, role = %caller.role, "Coupon write rejected");
                Err(AppError::wrong_role(Role::Enterprise))
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CouponInventory for CouponCatalog<U> {
    async fn list_all(&self, next: Option<String>) -> AppResult<CouponPage> {
        let after = next.filter(|token| !token.trim().is_empty());
        self.uow.coupons().list_page(after).await
    }

    async fn list_by_category(&self, category: &str) -> AppResult<Vec<Coupon>> {
        self.uow.coupons().list_by_category(category).await
    }

    async fn get(&self, id: &str) -> AppResult<Coupon> {
        self.uow
            .coupons()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Coupon")
    }

    async fn get_with_enterprise(&self, id: &str) -> AppResult<CouponDetail> {
        let coupon = self.get(id).await?;
        let enterprise = self
            .uow
            .accounts()
            .find(Role::Enterprise, &coupon.enterprise_id)
            .await?
            .as_ref()
            .and_then(EnterpriseSummary::from_account)
            .ok_or_not_found("Enterprise")?;

        Ok(CouponDetail { coupon, enterprise })
    }

    async fn create(
        &self,
        caller: &Claims,
        draft: CouponDraft,
        enterprise_id: Option<String>,
    ) -> AppResult<Coupon> {
        let owner = self.resolve_owner(caller, enterprise_id).await?;
        let coupon = draft.into_coupon(Uuid::new_v4().to_string(), owner, Utc::now())?;

        let coupon = self.uow.coupons().upsert(coupon).await?;
        tracing::info!(coupon_id = %coupon.id, enterprise = %coupon.enterprise_id, "Coupon published");
        Ok(coupon)
    }

    async fn update(
        &self,
        caller: &Claims,
        path_id: &str,
        body_id: &str,
        draft: CouponDraft,
        enterprise_id: Option<String>,
    ) -> AppResult<Coupon> {
        if path_id != body_id {
            return Err(DomainError::IdMismatch {
                path: path_id.to_string(),
                body: body_id.to_string(),
            }
            .into());
        }

        let existing = self.uow.coupons().find_by_id(path_id).await?;
        let owner = match (&existing, caller.role) {
            (Some(current), Role::Enterprise) if current.enterprise_id != caller.sub => {
                return Err(AppError::forbidden(
                    "you must own this coupon to modify it",
                ));
            }
            (Some(current), Role::Administrator) if enterprise_id.is_none() => {
                current.enterprise_id.clone()
            }
            _ => self.resolve_owner(caller, enterprise_id).await?,
        };

        let coupon = draft.into_coupon(path_id.to_string(), owner, Utc::now())?;
        let coupon = self.uow.coupons().upsert(coupon).await?;
        tracing::info!(coupon_id = %coupon.id, "Coupon updated");
        Ok(coupon)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mockall::predicate::eq;

    use domain::{Account, EnterpriseProfile, Profile};

    use super::*;
    use crate::repository::{MockAccountRepository, MockCouponRepository, MockOfferRepository};
    use crate::service::test_support::TestUnitOfWork;

    fn claims(sub: &str, role: Role) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: sub.to_string(),
            username: sub.to_string(),
            role,
            exp: now + 3600,
            iat: now,
        }
    }

    fn draft() -> CouponDraft {
        CouponDraft {
            title: "2x1 Pizza".to_string(),
            regular_price: 20.0,
            offer_price: 10.0,
            valid_from: None,
            valid_until: Utc::now() + Duration::days(10),
            available_coupons: 5,
            offer_desc: "Two for one".to_string(),
            category: "food".to_string(),
        }
    }

    fn existing(id: &str, owner: &str) -> Coupon {
        draft()
            .into_coupon(id.to_string(), owner.to_string(), Utc::now())
            .unwrap()
    }

    fn catalog(
        accounts: MockAccountRepository,
        coupons: MockCouponRepository,
    ) -> CouponCatalog<TestUnitOfWork> {
        CouponCatalog::new(Arc::new(TestUnitOfWork::new(
            accounts,
            coupons,
            MockOfferRepository::new(),
        )))
    }

    #[tokio::test]
    async fn test_update_id_mismatch_writes_nothing() {
        let mut coupons = MockCouponRepository::new();
        coupons.expect_find_by_id().never();
        coupons.expect_upsert().never();

        let result = catalog(MockAccountRepository::new(), coupons)
            .update(
                &claims("shop@example.com", Role::Enterprise),
                "c1",
                "c2",
                draft(),
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::IdMismatch(_))));
    }

    #[tokio::test]
    async fn test_create_as_enterprise_owns_coupon() {
        let mut coupons = MockCouponRepository::new();
        coupons
            .expect_upsert()
            .withf(|c| c.enterprise_id == "shop@example.com" && !c.id.is_empty())
            .returning(Ok);

        let coupon = catalog(MockAccountRepository::new(), coupons)
            .create(&claims("shop@example.com", Role::Enterprise), draft(), None)
            .await
            .unwrap();

        assert!(Uuid::parse_str(&coupon.id).is_ok());
    }

    #[tokio::test]
    async fn test_create_as_client_rejected() {
        let mut coupons = MockCouponRepository::new();
        coupons.expect_upsert().never();

        let result = catalog(MockAccountRepository::new(), coupons)
            .create(&claims("ana@example.com", Role::Client), draft(), None)
            .await;

        assert!(matches!(result, Err(AppError::WrongRole { .. })));
    }

    #[tokio::test]
    async fn test_create_invalid_draft_writes_nothing() {
        let mut coupons = MockCouponRepository::new();
        coupons.expect_upsert().never();

        let mut bad = draft();
        bad.available_coupons = 0;

        let result = catalog(MockAccountRepository::new(), coupons)
            .create(&claims("shop@example.com", Role::Enterprise), bad, None)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_foreign_coupon_forbidden() {
        let mut coupons = MockCouponRepository::new();
        coupons
            .expect_find_by_id()
            .with(eq("c1"))
            .returning(|id| Ok(Some(existing(id, "other@example.com"))));
        coupons.expect_upsert().never();

        let result = catalog(MockAccountRepository::new(), coupons)
            .update(
                &claims("shop@example.com", Role::Enterprise),
                "c1",
                "c1",
                draft(),
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_update_keeps_owner() {
        let mut coupons = MockCouponRepository::new();
        coupons
            .expect_find_by_id()
            .returning(|id| Ok(Some(existing(id, "shop@example.com"))));
        coupons
            .expect_upsert()
            .withf(|c| c.id == "c1" && c.enterprise_id == "shop@example.com")
            .returning(Ok);

        let coupon = catalog(MockAccountRepository::new(), coupons)
            .update(
                &claims("root@example.com", Role::Administrator),
                "c1",
                "c1",
                draft(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(coupon.available_coupons, 5);
    }

    #[tokio::test]
    async fn test_admin_create_needs_existing_enterprise() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find()
            .with(eq(Role::Enterprise), eq("ghost@example.com"))
            .returning(|_, _| Ok(None));
        let mut coupons = MockCouponRepository::new();
        coupons.expect_upsert().never();

        let result = catalog(accounts, coupons)
            .create(
                &claims("root@example.com", Role::Administrator),
                draft(),
                Some("ghost@example.com".to_string()),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_admin_create_normalizes_enterprise_email() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find()
            .with(eq(Role::Enterprise), eq("contact@shop.com"))
            .returning(|_, email| {
                Ok(Some(Account {
                    email: email.to_string(),
                    username: "shop".to_string(),
                    password_hash: String::new(),
                    created_at: Utc::now(),
                    profile: Profile::Enterprise(EnterpriseProfile {
                        enterprise_code: "SHOP".to_string(),
                        enterprise_name: "Shop".to_string(),
                        schedule_description: None,
                        location: None,
                        phone_number: None,
                        category: "food".to_string(),
                    }),
                }))
            });
        let mut coupons = MockCouponRepository::new();
        coupons
            .expect_upsert()
            .withf(|c| c.enterprise_id == "contact@shop.com")
            .returning(Ok);

        let coupon = catalog(accounts, coupons)
            .create(
                &claims("root@example.com", Role::Administrator),
                draft(),
                Some(" Contact@Shop.com ".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(coupon.enterprise_id, "contact@shop.com");
    }

    #[tokio::test]
    async fn test_blank_page_token_starts_over() {
        let mut coupons = MockCouponRepository::new();
        coupons
            .expect_list_page()
            .with(eq(None::<String>))
            .returning(|_| {
                Ok(CouponPage {
                    coupons: vec![],
                    next: None,
                })
            });

        let page = catalog(MockAccountRepository::new(), coupons)
            .list_all(Some("   ".to_string()))
            .await
            .unwrap();

        assert!(page.coupons.is_empty());
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_coupon() {
        let mut coupons = MockCouponRepository::new();
        coupons.expect_find_by_id().returning(|_| Ok(None));

        let result = catalog(MockAccountRepository::new(), coupons)
            .get("nope")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_with_enterprise() {
        let mut coupons = MockCouponRepository::new();
        coupons
            .expect_find_by_id()
            .returning(|id| Ok(Some(existing(id, "shop@example.com"))));
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find().returning(|_, email| {
            Ok(Some(Account {
                email: email.to_string(),
                username: "shop".to_string(),
                password_hash: String::new(),
                created_at: Utc::now(),
                profile: Profile::Enterprise(EnterpriseProfile {
                    enterprise_code: "SHOP".to_string(),
                    enterprise_name: "The Shop".to_string(),
                    schedule_description: None,
                    location: Some("Downtown".to_string()),
                    phone_number: None,
                    category: "food".to_string(),
                }),
            }))
        });

        let detail = catalog(accounts, coupons).get_with_enterprise("c1").await.unwrap();

        assert_eq!(detail.coupon.id, "c1");
        assert_eq!(detail.enterprise.enterprise_code, "SHOP");
    }
}
