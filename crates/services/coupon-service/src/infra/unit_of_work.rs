//! Unit of Work: repository access plus transaction management.
//!
//! Plain reads and single-row writes go through the shared repositories.
//! Operations that must change several rows atomically run inside
//! [`UnitOfWork::transaction`] and use the transaction-bound repositories
//! exposed by [`TransactionContext`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, OnConflict, SimpleExpr},
    AccessMode, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IsolationLevel, QueryFilter, TransactionTrait,
};

use common::{AppError, AppResult};
use domain::{GeneratedOffer, UNLIMITED_STOCK};

use crate::repository::entities::{coupon, generated_offer};
use crate::repository::{
    AccountRepository, AccountStore, CouponRepository, CouponStore, OfferRepository, OfferStore,
};

/// Boxed closure body run inside a transaction.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not object safe because of the generic transaction method. Services take it
/// as a type parameter.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn coupons(&self) -> Arc<dyn CouponRepository>;

    fn offers(&self) -> Arc<dyn OfferRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn coupons(&self) -> TxCouponRepository<'_> {
        TxCouponRepository { txn: self.txn }
    }

    pub fn offers(&self) -> TxOfferRepository<'_> {
        TxOfferRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    account_repo: Arc<AccountStore>,
    coupon_repo: Arc<CouponStore>,
    offer_repo: Arc<OfferStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            account_repo: Arc::new(AccountStore::new(db.clone())),
            coupon_repo: Arc::new(CouponStore::new(db.clone())),
            offer_repo: Arc::new(OfferStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.account_repo.clone()
    }

    fn coupons(&self) -> Arc<dyn CouponRepository> {
        self.coupon_repo.clone()
    }

    fn offers(&self) -> Arc<dyn OfferRepository> {
        self.offer_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        let result = f(TransactionContext::new(&txn)).await;

        match result {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-bound coupon writes.
pub struct TxCouponRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCouponRepository<'a> {
    /// Take one unit of stock.
    ///
    /// The stock read and the decrement happen in one statement, so two
    /// buyers racing for the last unit cannot both win. Unlimited stock
    /// matches the filter but keeps its value.
    pub async fn reserve_stock(&self, coupon_id: &str) -> AppResult<()> {
        let stock = Expr::col(coupon::Column::AvailableCoupons);
        let remaining: SimpleExpr = Expr::case(stock.clone().eq(UNLIMITED_STOCK), UNLIMITED_STOCK)
            .finally(stock.sub(1))
            .into();

        let result = coupon::Entity::update_many()
            .col_expr(coupon::Column::AvailableCoupons, remaining)
            .filter(coupon::Column::Id.eq(coupon_id))
            .filter(
                Condition::any()
                    .add(coupon::Column::AvailableCoupons.gt(0))
                    .add(coupon::Column::AvailableCoupons.eq(UNLIMITED_STOCK)),
            )
            .exec(self.txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::SoldOut);
        }
        Ok(())
    }
}

/// Transaction-bound offer writes.
pub struct TxOfferRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOfferRepository<'a> {
    /// Insert an offer unless its id is taken. Returns whether a row was written.
    pub async fn insert_new(&self, offer: GeneratedOffer) -> AppResult<bool> {
        let rows = generated_offer::Entity::insert(generated_offer::ActiveModel::from(offer))
            .on_conflict(
                OnConflict::column(generated_offer::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.txn)
            .await?;

        Ok(rows == 1)
    }
}

/// Run a block inside a transaction with less boilerplate.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
