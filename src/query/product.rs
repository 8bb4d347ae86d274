use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{contains_ci, contains_ci_opt, search_condition, search_term, Keyed, RowFilter, RowSort, Sort, SortKey};
use crate::entities::product;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub brand: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// `stock_quantity <= low_stock_threshold`, evaluated in process.
    pub low_stock: Option<bool>,
    pub out_of_stock: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    Name,
    Price,
    Sku,
    StockQuantity,
    CreatedAt,
    UpdatedAt,
}

impl SortKey for ProductSort {
    fn default_sort() -> Sort<Self> {
        Sort::desc(ProductSort::CreatedAt)
    }
}

impl Keyed for product::Model {
    fn key(&self) -> i32 {
        self.id
    }
}

const SEARCH_COLUMNS: [product::Column; 3] = [
    product::Column::Name,
    product::Column::Description,
    product::Column::Sku,
];

impl RowFilter<product::Model> for ProductFilters {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = search_term(&self.search) {
            condition = condition.add(search_condition(&SEARCH_COLUMNS, term));
        }
        if let Some(category_id) = self.category_id {
            condition = condition.add(product::Column::CategoryId.eq(category_id));
        }
        if let Some(is_active) = self.is_active {
            condition = condition.add(product::Column::IsActive.eq(is_active));
        }
        if let Some(is_featured) = self.is_featured {
            condition = condition.add(product::Column::IsFeatured.eq(is_featured));
        }
        if let Some(brand) = &self.brand {
            condition = condition.add(product::Column::Brand.eq(brand.as_str()));
        }
        if let Some(min_price) = self.min_price {
            condition = condition.add(product::Column::Price.gte(min_price));
        }
        if let Some(max_price) = self.max_price {
            condition = condition.add(product::Column::Price.lte(max_price));
        }
        match self.out_of_stock {
            Some(true) => condition = condition.add(product::Column::StockQuantity.lte(0)),
            Some(false) => condition = condition.add(product::Column::StockQuantity.gt(0)),
            None => {}
        }

        condition
    }

    fn row_predicate(&self, row: &product::Model) -> bool {
        match self.low_stock {
            Some(wanted) => row.is_low_stock() == wanted,
            None => true,
        }
    }

    fn needs_row_pass(&self) -> bool {
        self.low_stock.is_some()
    }

    fn matches(&self, row: &product::Model) -> bool {
        if let Some(term) = search_term(&self.search) {
            let hit = contains_ci(&row.name, term)
                || contains_ci_opt(row.description.as_deref(), term)
                || contains_ci(&row.sku, term);
            if !hit {
                return false;
            }
        }
        if self.category_id.is_some() && row.category_id != self.category_id {
            return false;
        }
        if self.is_active.is_some_and(|v| row.is_active != v) {
            return false;
        }
        if self.is_featured.is_some_and(|v| row.is_featured != v) {
            return false;
        }
        if self.brand.is_some() && row.brand != self.brand {
            return false;
        }
        if self.min_price.is_some_and(|min| row.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| row.price > max) {
            return false;
        }
        if self.out_of_stock.is_some_and(|v| row.is_out_of_stock() != v) {
            return false;
        }
        self.row_predicate(row)
    }
}

impl RowSort<product::Model> for ProductSort {
    type Entity = product::Entity;

    fn column(self) -> product::Column {
        match self {
            ProductSort::Name => product::Column::Name,
            ProductSort::Price => product::Column::Price,
            ProductSort::Sku => product::Column::Sku,
            ProductSort::StockQuantity => product::Column::StockQuantity,
            ProductSort::CreatedAt => product::Column::CreatedAt,
            ProductSort::UpdatedAt => product::Column::UpdatedAt,
        }
    }

    fn id_column() -> product::Column {
        product::Column::Id
    }

    fn compare(self, a: &product::Model, b: &product::Model) -> Ordering {
        match self {
            ProductSort::Name => a.name.cmp(&b.name),
            ProductSort::Price => a.price.cmp(&b.price),
            ProductSort::Sku => a.sku.cmp(&b.sku),
            ProductSort::StockQuantity => a.stock_quantity.cmp(&b.stock_quantity),
            ProductSort::CreatedAt => a.created_at.cmp(&b.created_at),
            ProductSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}
