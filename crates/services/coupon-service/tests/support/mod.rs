//! Shared fixtures for integration tests: an in-memory SQLite store with
//! seeded accounts and coupons.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};

use common::{DatabaseConfig, JwtConfig};
use coupon_service_lib::infra::{Database, Persistence};
use coupon_service_lib::repository::{CouponRepository, CouponStore};
use coupon_service_lib::service::{
    AccountManager, AccountService, AuthGuard, Claims, Credentials, JwtGuard,
};
use domain::{ClientProfile, Coupon, EmployeeProfile, EnterpriseProfile, Role};

pub const SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const PASSWORD: &str = "correct-horse-battery";

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(SECRET)
}

/// Fresh migrated in-memory database.
pub async fn database() -> Database {
    Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database")
}

pub struct Fixture {
    pub db: Database,
    pub uow: Arc<Persistence>,
    pub guard: Arc<JwtGuard>,
    pub accounts: AccountManager<Persistence>,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = database().await;
        let uow = Arc::new(Persistence::new(db.get_connection()));
        let guard = Arc::new(JwtGuard::new(jwt_config()));
        let accounts = AccountManager::new(uow.clone(), guard.clone() as Arc<dyn AuthGuard>);

        Self {
            db,
            uow,
            guard,
            accounts,
        }
    }

    pub async fn enterprise(&self, email: &str, code: &str) -> Claims {
        self.accounts
            .register_enterprise(
                credentials(email),
                EnterpriseProfile {
                    enterprise_code: code.to_string(),
                    enterprise_name: format!("{} S.A.", code),
                    schedule_description: Some("Mon-Fri 9-17".to_string()),
                    location: Some("San Salvador".to_string()),
                    phone_number: None,
                    category: "food".to_string(),
                },
            )
            .await
            .expect("enterprise registered");
        claims(email, Role::Enterprise)
    }

    pub async fn client(&self, email: &str) -> Claims {
        self.accounts
            .register_client(
                credentials(email),
                ClientProfile {
                    first_name: "Ana".to_string(),
                    last_name: "Lopez".to_string(),
                    address: None,
                    phone_number: None,
                    dui: "01234567-8".to_string(),
                },
            )
            .await
            .expect("client registered");
        claims(email, Role::Client)
    }

    pub async fn employee(&self, employer: &Claims, email: &str) -> Claims {
        self.accounts
            .register_employee(
                employer,
                credentials(email),
                EmployeeProfile {
                    first_name: "Eva".to_string(),
                    last_name: "Cruz".to_string(),
                    phone_number: None,
                    dui: "98765432-1".to_string(),
                    enterprise_id: String::new(),
                },
            )
            .await
            .expect("employee registered");
        claims(email, Role::Employee)
    }

    /// Store a coupon directly, bypassing publishing rules.
    pub async fn coupon(&self, id: &str, stock: i32, enterprise: &str) -> Coupon {
        CouponStore::new(self.db.get_connection())
            .upsert(coupon(id, stock, enterprise))
            .await
            .expect("coupon stored")
    }

    pub async fn stock_of(&self, id: &str) -> i32 {
        CouponStore::new(self.db.get_connection())
            .find_by_id(id)
            .await
            .expect("coupon lookup")
            .expect("coupon exists")
            .available_coupons
    }

    /// Signed bearer token for `claims`.
    pub fn token(&self, claims: &Claims) -> String {
        self.guard.sign(claims).expect("token signed")
    }
}

pub fn credentials(email: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        username: email.split('@').next().unwrap_or(email).to_string(),
        password: PASSWORD.to_string(),
    }
}

pub fn claims(email: &str, role: Role) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: email.to_string(),
        username: email.to_string(),
        role,
        exp: now + 3600,
        iat: now,
    }
}

pub fn coupon(id: &str, stock: i32, enterprise: &str) -> Coupon {
    Coupon {
        id: id.to_string(),
        title: format!("Coupon {}", id),
        regular_price: 20.0,
        offer_price: 10.0,
        valid_from: Utc::now() - Duration::days(1),
        valid_until: Utc::now() + Duration::days(30),
        available_coupons: stock,
        offer_desc: "Two for one".to_string(),
        category: "food".to_string(),
        enterprise_id: enterprise.to_string(),
    }
}
