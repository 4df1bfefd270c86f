//! Account repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
};

use super::entities::account::{self, active_model, Entity as AccountEntity};
use common::{AppError, AppResult};
use domain::{Account, NewAccount, Role};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by role and email
    async fn find(&self, role: Role, email: &str) -> AppResult<Option<Account>>;

    /// Find the enterprise that owns an enterprise code
    async fn find_enterprise_by_code(&self, code: &str) -> AppResult<Option<Account>>;

    /// Insert a new account
    async fn create(&self, account: NewAccount) -> AppResult<Account>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find(&self, role: Role, email: &str) -> AppResult<Option<Account>> {
        AccountEntity::find_by_id((role.to_string(), email.to_string()))
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_enterprise_by_code(&self, code: &str) -> AppResult<Option<Account>> {
        AccountEntity::find()
            .filter(account::Column::Role.eq(Role::Enterprise.as_str()))
            .filter(account::Column::EnterpriseCode.eq(code))
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let row = active_model(account, chrono::Utc::now());

        let model = row.insert(&self.db).await.map_err(unique_as_conflict)?;
        Account::try_from(model)
    }
}

/// A unique-key violation on insert means someone registered first.
fn unique_as_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Account"),
        _ => AppError::from(err),
    }
}
