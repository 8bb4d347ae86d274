use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "shipping_methods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub zone_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub estimated_days: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::shipping_zone::Entity",
        from = "Column::ZoneId",
        to = "crate::entities::shipping_zone::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    ShippingZone,
}

impl Related<crate::entities::shipping_zone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingZone.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
