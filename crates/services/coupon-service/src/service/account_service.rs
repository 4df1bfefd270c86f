//! Account service - registration and login for every marketplace role.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::{
    Account, AccountResponse, AdministratorProfile, ClientProfile, EmployeeProfile,
    EnterpriseProfile, NewAccount, Password, Profile, Role,
};

use super::auth_guard::{require_role, AuthGuard, Claims, TokenResponse};
use crate::infra::UnitOfWork;

/// Hash verified when the account does not exist, so unknown emails take as
/// long to reject as wrong passwords.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$Wk5Zq3n8dO3kU2H7l7b0cVf2o5p0kF2vX3mD9yQ1sLk";

/// Login and profile credentials shared by every registration.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn register_client(
        &self,
        credentials: Credentials,
        profile: ClientProfile,
    ) -> AppResult<Account>;

    async fn register_enterprise(
        &self,
        credentials: Credentials,
        profile: EnterpriseProfile,
    ) -> AppResult<Account>;

    /// Register an employee for the calling enterprise.
    ///
    /// `profile.enterprise_id` is overwritten with the caller's email.
    async fn register_employee(
        &self,
        caller: &Claims,
        credentials: Credentials,
        profile: EmployeeProfile,
    ) -> AppResult<Account>;

    /// Bootstrap an administrator. Only reachable from the CLI.
    async fn register_administrator(
        &self,
        credentials: Credentials,
        profile: AdministratorProfile,
    ) -> AppResult<Account>;

    async fn login(&self, role: Role, email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Profile of a client account. Readable by that client or an administrator.
    async fn client_profile(&self, caller: &Claims, email: &str) -> AppResult<AccountResponse>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
    guard: Arc<dyn AuthGuard>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>, guard: Arc<dyn AuthGuard>) -> Self {
        Self { uow, guard }
    }

    async fn register(&self, credentials: Credentials, profile: Profile) -> AppResult<Account> {
        let role = profile.role();
        let email = credentials.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if credentials.username.trim().is_empty() {
            return Err(AppError::validation("Username is required"));
        }

        if self.uow.accounts().find(role, &email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&credentials.password)?.into_string();
        let account = self
            .uow
            .accounts()
            .create(NewAccount {
                email,
                username: credentials.username.trim().to_string(),
                password_hash,
                profile,
            })
            .await?;

        tracing::info!(email = %account.email, role = %role, "Account registered");
        Ok(account)
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn register_client(
        &self,
        credentials: Credentials,
        profile: ClientProfile,
    ) -> AppResult<Account> {
        self.register(credentials, Profile::Client(profile)).await
    }

    async fn register_enterprise(
        &self,
        credentials: Credentials,
        profile: EnterpriseProfile,
    ) -> AppResult<Account> {
        EnterpriseProfile::validate_code(&profile.enterprise_code)?;

        if self
            .uow
            .accounts()
            .find_enterprise_by_code(&profile.enterprise_code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Enterprise code"));
        }

        self.register(credentials, Profile::Enterprise(profile)).await
    }

    async fn register_employee(
        &self,
        caller: &Claims,
        credentials: Credentials,
        mut profile: EmployeeProfile,
    ) -> AppResult<Account> {
        require_role(caller, Role::Enterprise)?;
        profile.enterprise_id = caller.sub.clone();

        self.register(credentials, Profile::Employee(profile)).await
    }

    async fn register_administrator(
        &self,
        credentials: Credentials,
        profile: AdministratorProfile,
    ) -> AppResult<Account> {
        self.register(credentials, Profile::Administrator(profile))
            .await
    }

    async fn login(&self, role: Role, email: &str, password: &str) -> AppResult<TokenResponse> {
        let email = email.trim().to_lowercase();
        let account = self.uow.accounts().find(role, &email).await?;

        let stored = Password::from_hash(
            account
                .as_ref()
                .map(|a| a.password_hash.as_str())
                .unwrap_or(DUMMY_HASH),
        );
        let password_valid = stored.verify(password);

        match account {
            Some(account) if password_valid => self.guard.issue(&account),
            _ => {
                tracing::warn!(email = %email, role = %role, "Failed login attempt");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn client_profile(&self, caller: &Claims, email: &str) -> AppResult<AccountResponse> {
        let email = email.trim().to_lowercase();
        match caller.role {
            Role::Client if caller.sub == email => {}
            Role::Client => {
                return Err(AppError::forbidden("you can only view your own profile"));
            }
            Role::Administrator => {}
            _ => return Err(AppError::wrong_role(Role::Client)),
        }

        let account = self
            .uow
            .accounts()
            .find(Role::Client, &email)
            .await?
            .ok_or_not_found("Client")?;

        Ok(account.into())
    }
}
