//! Migration: Create the accounts table.
//!
//! One row per `(role, email)`. Role-specific columns are nullable.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Accounts::Email).string().not_null())
                    .col(ColumnDef::new(Accounts::Username).string().not_null())
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Accounts::FirstName).string().null())
                    .col(ColumnDef::new(Accounts::LastName).string().null())
                    .col(ColumnDef::new(Accounts::Address).string().null())
                    .col(ColumnDef::new(Accounts::PhoneNumber).string().null())
                    .col(ColumnDef::new(Accounts::Dui).string().null())
                    .col(ColumnDef::new(Accounts::EnterpriseId).string().null())
                    .col(
                        ColumnDef::new(Accounts::EnterpriseCode)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::EnterpriseName).string().null())
                    .col(ColumnDef::new(Accounts::ScheduleDescription).string().null())
                    .col(ColumnDef::new(Accounts::Location).string().null())
                    .col(ColumnDef::new(Accounts::Category).string().null())
                    .primary_key(Index::create().col(Accounts::Role).col(Accounts::Email))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_enterprise_id")
                    .table(Accounts::Table)
                    .col(Accounts::EnterpriseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Role,
    Email,
    Username,
    PasswordHash,
    CreatedAt,
    FirstName,
    LastName,
    Address,
    PhoneNumber,
    Dui,
    EnterpriseId,
    EnterpriseCode,
    EnterpriseName,
    ScheduleDescription,
    Location,
    Category,
}
