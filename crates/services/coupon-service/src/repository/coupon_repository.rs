//! Coupon repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::entities::coupon::{self, ActiveModel, Entity as CouponEntity};
use common::AppResult;
use domain::{Coupon, CouponPage, COUPON_PAGE_SIZE};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Coupon repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Find coupon by ID
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Coupon>>;

    /// One page of coupons in ascending id order, starting after `after`
    async fn list_page(&self, after: Option<String>) -> AppResult<CouponPage>;

    /// Every coupon in a category
    async fn list_by_category(&self, category: &str) -> AppResult<Vec<Coupon>>;

    /// Create or overwrite a coupon
    async fn upsert(&self, coupon: Coupon) -> AppResult<Coupon>;
}

/// Concrete implementation of CouponRepository
pub struct CouponStore {
    db: DatabaseConnection,
}

impl CouponStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CouponRepository for CouponStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Coupon>> {
        let result = CouponEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;

        Ok(result.map(Coupon::from))
    }

    async fn list_page(&self, after: Option<String>) -> AppResult<CouponPage> {
        let mut query = CouponEntity::find().order_by_asc(coupon::Column::Id);
        if let Some(after) = after {
            query = query.filter(coupon::Column::Id.gt(after));
        }

        // One extra row tells whether another page follows.
        let mut coupons: Vec<Coupon> = query
            .limit(COUPON_PAGE_SIZE + 1)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Coupon::from)
            .collect();

        let next = if coupons.len() as u64 > COUPON_PAGE_SIZE {
            coupons.truncate(COUPON_PAGE_SIZE as usize);
            coupons.last().map(|c| c.id.clone())
        } else {
            None
        };

        Ok(CouponPage { coupons, next })
    }

    async fn list_by_category(&self, category: &str) -> AppResult<Vec<Coupon>> {
        let models = CouponEntity::find()
            .filter(coupon::Column::Category.eq(category))
            .order_by_asc(coupon::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Coupon::from).collect())
    }

    async fn upsert(&self, coupon: Coupon) -> AppResult<Coupon> {
        CouponEntity::insert(ActiveModel::from(coupon.clone()))
            .on_conflict(
                OnConflict::column(coupon::Column::Id)
                    .update_columns([
                        coupon::Column::Title,
                        coupon::Column::RegularPrice,
                        coupon::Column::OfferPrice,
                        coupon::Column::ValidFrom,
                        coupon::Column::ValidUntil,
                        coupon::Column::AvailableCoupons,
                        coupon::Column::OfferDesc,
                        coupon::Column::Category,
                        coupon::Column::EnterpriseId,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(coupon)
    }
}
