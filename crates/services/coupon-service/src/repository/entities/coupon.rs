//! Coupon database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::Coupon;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub regular_price: f64,
    pub offer_price: f64,
    pub valid_from: DateTimeUtc,
    pub valid_until: DateTimeUtc,
    /// `-1` means unlimited
    pub available_coupons: i32,
    #[sea_orm(column_type = "Text")]
    pub offer_desc: String,
    pub category: String,
    pub enterprise_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::generated_offer::Entity")]
    GeneratedOffers,
}

impl Related<super::generated_offer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneratedOffers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Coupon {
    fn from(model: Model) -> Self {
        Coupon {
            id: model.id,
            title: model.title,
            regular_price: model.regular_price,
            offer_price: model.offer_price,
            valid_from: model.valid_from,
            valid_until: model.valid_until,
            available_coupons: model.available_coupons,
            offer_desc: model.offer_desc,
            category: model.category,
            enterprise_id: model.enterprise_id,
        }
    }
}

impl From<Coupon> for ActiveModel {
    fn from(coupon: Coupon) -> Self {
        ActiveModel {
            id: Set(coupon.id),
            title: Set(coupon.title),
            regular_price: Set(coupon.regular_price),
            offer_price: Set(coupon.offer_price),
            valid_from: Set(coupon.valid_from),
            valid_until: Set(coupon.valid_until),
            available_coupons: Set(coupon.available_coupons),
            offer_desc: Set(coupon.offer_desc),
            category: Set(coupon.category),
            enterprise_id: Set(coupon.enterprise_id),
        }
    }
}
