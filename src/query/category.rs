use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{contains_ci, contains_ci_opt, search_condition, search_term, Keyed, RowFilter, RowSort, Sort, SortKey};
use crate::entities::category;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilters {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub parent_id: Option<i32>,
    /// Only categories without a parent.
    pub root_only: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySort {
    Name,
    SortOrder,
    CreatedAt,
}

impl SortKey for CategorySort {
    fn default_sort() -> Sort<Self> {
        Sort::asc(CategorySort::SortOrder)
    }
}

impl Keyed for category::Model {
    fn key(&self) -> i32 {
        self.id
    }
}

const SEARCH_COLUMNS: [category::Column; 2] =
    [category::Column::Name, category::Column::Description];

impl RowFilter<category::Model> for CategoryFilters {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = search_term(&self.search) {
            condition = condition.add(search_condition(&SEARCH_COLUMNS, term));
        }
        if let Some(is_active) = self.is_active {
            condition = condition.add(category::Column::IsActive.eq(is_active));
        }
        if let Some(parent_id) = self.parent_id {
            condition = condition.add(category::Column::ParentId.eq(parent_id));
        }
        if self.root_only.unwrap_or(false) {
            condition = condition.add(category::Column::ParentId.is_null());
        }

        condition
    }

    fn matches(&self, row: &category::Model) -> bool {
        if let Some(term) = search_term(&self.search) {
            if !contains_ci(&row.name, term) && !contains_ci_opt(row.description.as_deref(), term) {
                return false;
            }
        }
        if self.is_active.is_some_and(|v| row.is_active != v) {
            return false;
        }
        if self.parent_id.is_some() && row.parent_id != self.parent_id {
            return false;
        }
        if self.root_only.unwrap_or(false) && row.parent_id.is_some() {
            return false;
        }
        true
    }
}

impl RowSort<category::Model> for CategorySort {
    type Entity = category::Entity;

    fn column(self) -> category::Column {
        match self {
            CategorySort::Name => category::Column::Name,
            CategorySort::SortOrder => category::Column::SortOrder,
            CategorySort::CreatedAt => category::Column::CreatedAt,
        }
    }

    fn id_column() -> category::Column {
        category::Column::Id
    }

    fn compare(self, a: &category::Model, b: &category::Model) -> Ordering {
        match self {
            CategorySort::Name => a.name.cmp(&b.name),
            CategorySort::SortOrder => a.sort_order.cmp(&b.sort_order),
            CategorySort::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}
