//! Migration: Create the generated_offers table.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_coupons_table::Coupons;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GeneratedOffers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedOffers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GeneratedOffers::CouponId).string().not_null())
                    .col(ColumnDef::new(GeneratedOffers::UserId).string().not_null())
                    .col(
                        ColumnDef::new(GeneratedOffers::GeneratedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedOffers::ExpirationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedOffers::Redeemed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generated_offers_coupon")
                            .from(GeneratedOffers::Table, GeneratedOffers::CouponId)
                            .to(Coupons::Table, Coupons::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_generated_offers_user_id")
                    .table(GeneratedOffers::Table)
                    .col(GeneratedOffers::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneratedOffers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GeneratedOffers {
    Table,
    Id,
    CouponId,
    UserId,
    GeneratedAt,
    ExpirationDate,
    Redeemed,
}
