//! Offer ledger: storage for generated offers.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use super::entities::generated_offer::{self, ActiveModel, Entity as OfferEntity};
use common::AppResult;
use domain::GeneratedOffer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Generated offer repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Find offer by ID
    async fn find_by_id(&self, id: &str) -> AppResult<Option<GeneratedOffer>>;

    /// Create or overwrite an offer
    async fn put(&self, offer: GeneratedOffer) -> AppResult<()>;

    /// Every offer bought by a user, newest first
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<GeneratedOffer>>;

    /// Flip `redeemed` to true. Returns false if the offer was already redeemed or is missing.
    async fn mark_redeemed(&self, id: &str) -> AppResult<bool>;
}

/// Concrete implementation of OfferRepository
pub struct OfferStore {
    db: DatabaseConnection,
}

impl OfferStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OfferRepository for OfferStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<GeneratedOffer>> {
        let result = OfferEntity::find_by_id(id.to_string()).one(&self.db).await?;

        Ok(result.map(GeneratedOffer::from))
    }

    async fn put(&self, offer: GeneratedOffer) -> AppResult<()> {
        OfferEntity::insert(ActiveModel::from(offer))
            .on_conflict(
                OnConflict::column(generated_offer::Column::Id)
                    .update_columns([
                        generated_offer::Column::CouponId,
                        generated_offer::Column::UserId,
                        generated_offer::Column::GeneratedAt,
                        generated_offer::Column::ExpirationDate,
                        generated_offer::Column::Redeemed,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<GeneratedOffer>> {
        let models = OfferEntity::find()
            .filter(generated_offer::Column::UserId.eq(user_id))
            .order_by_desc(generated_offer::Column::GeneratedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(GeneratedOffer::from).collect())
    }

    async fn mark_redeemed(&self, id: &str) -> AppResult<bool> {
        let result = OfferEntity::update_many()
            .col_expr(generated_offer::Column::Redeemed, Expr::value(true))
            .filter(generated_offer::Column::Id.eq(id))
            .filter(generated_offer::Column::Redeemed.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
