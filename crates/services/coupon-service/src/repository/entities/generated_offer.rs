//! Generated offer database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::GeneratedOffer;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "generated_offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub coupon_id: String,
    pub user_id: String,
    pub generated_at: DateTimeUtc,
    pub expiration_date: DateTimeUtc,
    pub redeemed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::coupon::Entity",
        from = "Column::CouponId",
        to = "super::coupon::Column::Id"
    )]
    Coupon,
}

impl Related<super::coupon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coupon.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for GeneratedOffer {
    fn from(model: Model) -> Self {
        GeneratedOffer {
            id: model.id,
            coupon_id: model.coupon_id,
            user_id: model.user_id,
            generated_at: model.generated_at,
            expiration_date: model.expiration_date,
            redeemed: model.redeemed,
        }
    }
}

impl From<GeneratedOffer> for ActiveModel {
    fn from(offer: GeneratedOffer) -> Self {
        ActiveModel {
            id: Set(offer.id),
            coupon_id: Set(offer.coupon_id),
            user_id: Set(offer.user_id),
            generated_at: Set(offer.generated_at),
            expiration_date: Set(offer.expiration_date),
            redeemed: Set(offer.redeemed),
        }
    }
}
