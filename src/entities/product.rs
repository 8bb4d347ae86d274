use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::entities::category::Entity as Category;
use crate::entities::types::{NutritionalInfo, StringList};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(unique)]
    pub sku: String,
    pub price: i64,
    pub compare_price: Option<i64>,
    pub cost_price: Option<i64>,
    pub stock_quantity: i32,
    pub low_stock_threshold: i32,
    pub brand: Option<String>,
    pub images: StringList,
    pub tags: StringList,
    pub ingredients: StringList,
    pub nutritional_info: NutritionalInfo,
    #[sea_orm(indexed)]
    pub category_id: Option<i32>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn is_low_stock(&self) -> bool {
        is_low_stock(self.stock_quantity, self.low_stock_threshold)
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity <= 0
    }
}

/// Cross-column predicate; the store cannot evaluate it as a plain comparison.
pub fn is_low_stock(stock_quantity: i32, low_stock_threshold: i32) -> bool {
    stock_quantity <= low_stock_threshold
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Category",
        from = "crate::entities::product::Column::CategoryId",
        to = "crate::entities::category::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<crate::entities::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
