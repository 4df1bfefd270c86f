//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::AppError;
use domain::{
    Account, AdministratorProfile, ClientProfile, EmployeeProfile, EnterpriseProfile, NewAccount,
    Profile, Role,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub role: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTimeUtc,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub dui: Option<String>,
    /// Owning enterprise email (employees only)
    pub enterprise_id: Option<String>,
    #[sea_orm(unique)]
    pub enterprise_code: Option<String>,
    pub enterprise_name: Option<String>,
    pub schedule_description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn required(value: Option<String>, field: &str, email: &str) -> Result<String, AppError> {
    value.ok_or_else(|| {
        AppError::internal(format!("Account {} is missing column {}", email, field))
    })
}

/// Convert database row to domain entity.
///
/// Fails when the stored role is unknown or a column its profile needs is NULL.
impl TryFrom<Model> for Account {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: Role = model
            .role
            .parse()
            .map_err(|_| AppError::internal(format!("Unknown stored role '{}'", model.role)))?;
        let email = model.email.as_str();

        let profile = match role {
            Role::Client => Profile::Client(ClientProfile {
                first_name: required(model.first_name, "first_name", email)?,
                last_name: required(model.last_name, "last_name", email)?,
                address: model.address,
                phone_number: model.phone_number,
                dui: required(model.dui, "dui", email)?,
            }),
            Role::Employee => Profile::Employee(EmployeeProfile {
                first_name: required(model.first_name, "first_name", email)?,
                last_name: required(model.last_name, "last_name", email)?,
                phone_number: model.phone_number,
                dui: required(model.dui, "dui", email)?,
                enterprise_id: required(model.enterprise_id, "enterprise_id", email)?,
            }),
            Role::Enterprise => Profile::Enterprise(EnterpriseProfile {
                enterprise_code: required(model.enterprise_code, "enterprise_code", email)?,
                enterprise_name: required(model.enterprise_name, "enterprise_name", email)?,
                schedule_description: model.schedule_description,
                location: model.location,
                phone_number: model.phone_number,
                category: required(model.category, "category", email)?,
            }),
            Role::Administrator => Profile::Administrator(AdministratorProfile {
                first_name: required(model.first_name, "first_name", email)?,
                last_name: required(model.last_name, "last_name", email)?,
            }),
        };

        Ok(Account {
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
            created_at: model.created_at,
            profile,
        })
    }
}

/// Build an insertable row from registration data.
pub fn active_model(account: NewAccount, created_at: DateTimeUtc) -> ActiveModel {
    let mut row = ActiveModel {
        role: Set(account.profile.role().to_string()),
        email: Set(account.email),
        username: Set(account.username),
        password_hash: Set(account.password_hash),
        created_at: Set(created_at),
        first_name: Set(None),
        last_name: Set(None),
        address: Set(None),
        phone_number: Set(None),
        dui: Set(None),
        enterprise_id: Set(None),
        enterprise_code: Set(None),
        enterprise_name: Set(None),
        schedule_description: Set(None),
        location: Set(None),
        category: Set(None),
    };

    match account.profile {
        Profile::Client(p) => {
            row.first_name = Set(Some(p.first_name));
            row.last_name = Set(Some(p.last_name));
            row.address = Set(p.address);
            row.phone_number = Set(p.phone_number);
            row.dui = Set(Some(p.dui));
        }
        Profile::Employee(p) => {
            row.first_name = Set(Some(p.first_name));
            row.last_name = Set(Some(p.last_name));
            row.phone_number = Set(p.phone_number);
            row.dui = Set(Some(p.dui));
            row.enterprise_id = Set(Some(p.enterprise_id));
        }
        Profile::Enterprise(p) => {
            row.enterprise_code = Set(Some(p.enterprise_code));
            row.enterprise_name = Set(Some(p.enterprise_name));
            row.schedule_description = Set(p.schedule_description);
            row.location = Set(p.location);
            row.phone_number = Set(p.phone_number);
            row.category = Set(Some(p.category));
        }
        Profile::Administrator(p) => {
            row.first_name = Set(Some(p.first_name));
            row.last_name = Set(Some(p.last_name));
        }
    }

    row
}
