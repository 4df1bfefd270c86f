//! Marketplace accounts: clients, employees, enterprises and administrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMINISTRATOR, ROLE_CLIENT, ROLE_EMPLOYEE, ROLE_ENTERPRISE};
use crate::error::{DomainError, DomainResult};

/// Account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Employee,
    Enterprise,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => ROLE_CLIENT,
            Role::Employee => ROLE_EMPLOYEE,
            Role::Enterprise => ROLE_ENTERPRISE,
            Role::Administrator => ROLE_ADMINISTRATOR,
        }
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_CLIENT => Ok(Role::Client),
            ROLE_EMPLOYEE => Ok(Role::Employee),
            ROLE_ENTERPRISE => Ok(Role::Enterprise),
            ROLE_ADMINISTRATOR => Ok(Role::Administrator),
            other => Err(DomainError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub dui: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub dui: String,
    /// Email of the enterprise this employee works for
    pub enterprise_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseProfile {
    /// Short uppercase code that prefixes every generated offer id
    pub enterprise_code: String,
    pub enterprise_name: String,
    pub schedule_description: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub category: String,
}

impl EnterpriseProfile {
    /// Enterprise codes are non-empty and made of ASCII uppercase letters and digits.
    pub fn validate_code(code: &str) -> DomainResult<()> {
        let well_formed = !code.is_empty()
            && code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

        if well_formed {
            Ok(())
        } else {
            Err(DomainError::validation(
                "Enterprise code must contain only uppercase letters and digits",
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdministratorProfile {
    pub first_name: String,
    pub last_name: String,
}

/// Role-specific account data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Client(ClientProfile),
    Employee(EmployeeProfile),
    Enterprise(EnterpriseProfile),
    Administrator(AdministratorProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Client(_) => Role::Client,
            Profile::Employee(_) => Role::Employee,
            Profile::Enterprise(_) => Role::Enterprise,
            Profile::Administrator(_) => Role::Administrator,
        }
    }
}

/// Account domain entity. Identified by `(role, email)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
}

impl Account {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn as_employee(&self) -> Option<&EmployeeProfile> {
        match &self.profile {
            Profile::Employee(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn as_enterprise(&self) -> Option<&EnterpriseProfile> {
        match &self.profile {
            Profile::Enterprise(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Data needed to register an account (password already hashed).
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub profile: Profile,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            email: account.email,
            username: account.username,
            created_at: account.created_at,
            profile: account.profile,
        }
    }
}

/// Public enterprise details shown alongside a coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseSummary {
    pub email: String,
    pub enterprise_code: String,
    pub enterprise_name: String,
    pub schedule_description: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub category: String,
}

impl EnterpriseSummary {
    /// Build a summary from an enterprise account, `None` for any other role.
    pub fn from_account(account: &Account) -> Option<Self> {
        account.as_enterprise().map(|profile| Self {
            email: account.email.clone(),
            enterprise_code: profile.enterprise_code.clone(),
            enterprise_name: profile.enterprise_name.clone(),
            schedule_description: profile.schedule_description.clone(),
            location: profile.location.clone(),
            phone_number: profile.phone_number.clone(),
            category: profile.category.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [
            Role::Client,
            Role::Employee,
            Role::Enterprise,
            Role::Administrator,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_enterprise_code_validation() {
        assert!(EnterpriseProfile::validate_code("ATONIOSFOODS").is_ok());
        assert!(EnterpriseProfile::validate_code("ABC123").is_ok());
        assert!(EnterpriseProfile::validate_code("").is_err());
        assert!(EnterpriseProfile::validate_code("abc").is_err());
        assert!(EnterpriseProfile::validate_code("AB-C").is_err());
    }

    #[test]
    fn test_profile_serializes_with_role_tag() {
        let profile = Profile::Administrator(AdministratorProfile {
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
        });

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "administrator");
        assert_eq!(json["firstName"], "Ada");
    }
}
