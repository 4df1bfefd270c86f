//! Migration: Create the coupons table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coupons::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coupons::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Coupons::RegularPrice).double().not_null())
                    .col(ColumnDef::new(Coupons::OfferPrice).double().not_null())
                    .col(
                        ColumnDef::new(Coupons::ValidFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coupons::ValidUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coupons::AvailableCoupons)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Coupons::OfferDesc).text().not_null())
                    .col(ColumnDef::new(Coupons::Category).string().not_null())
                    .col(ColumnDef::new(Coupons::EnterpriseId).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coupons_category")
                    .table(Coupons::Table)
                    .col(Coupons::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coupons::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Coupons {
    Table,
    Id,
    Title,
    RegularPrice,
    OfferPrice,
    ValidFrom,
    ValidUntil,
    AvailableCoupons,
    OfferDesc,
    Category,
    EnterpriseId,
}
