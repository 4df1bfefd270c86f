//! Application state - Dependency injection container.

use std::sync::Arc;

use common::JwtConfig;

use crate::infra::{Database, Persistence};
use crate::service::{
    AccountManager, AccountService, AuthGuard, CouponCatalog, CouponInventory, JwtGuard,
    PurchaseEngine, PurchaseService,
};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Bearer token verification
    pub guard: Arc<dyn AuthGuard>,
    pub accounts: Arc<dyn AccountService>,
    pub coupons: Arc<dyn CouponInventory>,
    pub purchases: Arc<dyn PurchaseService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire every service over one database connection pool.
    pub fn from_database(database: Database, jwt: JwtConfig) -> Self {
        let uow = Arc::new(Persistence::new(database.get_connection()));
        let guard: Arc<dyn AuthGuard> = Arc::new(JwtGuard::new(jwt));

        Self {
            accounts: Arc::new(AccountManager::new(uow.clone(), guard.clone())),
            coupons: Arc::new(CouponCatalog::new(uow.clone())),
            purchases: Arc::new(PurchaseEngine::new(uow)),
            guard,
            database: Arc::new(database),
        }
    }
}
