use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{contains_ci, search_condition, search_term, Keyed, RowFilter, RowSort, Sort, SortKey};
use crate::entities::review;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewFilters {
    pub search: Option<String>,
    pub product_id: Option<i32>,
    pub user_id: Option<i32>,
    pub rating: Option<i32>,
    pub min_rating: Option<i32>,
    pub is_approved: Option<bool>,
    pub verified_purchase: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    Rating,
    CreatedAt,
}

impl SortKey for ReviewSort {
    fn default_sort() -> Sort<Self> {
        Sort::desc(ReviewSort::CreatedAt)
    }
}

impl Keyed for review::Model {
    fn key(&self) -> i32 {
        self.id
    }
}

const SEARCH_COLUMNS: [review::Column; 2] = [review::Column::Title, review::Column::Comment];

impl RowFilter<review::Model> for ReviewFilters {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = search_term(&self.search) {
            condition = condition.add(search_condition(&SEARCH_COLUMNS, term));
        }
        if let Some(product_id) = self.product_id {
            condition = condition.add(review::Column::ProductId.eq(product_id));
        }
        if let Some(user_id) = self.user_id {
            condition = condition.add(review::Column::UserId.eq(user_id));
        }
        if let Some(rating) = self.rating {
            condition = condition.add(review::Column::Rating.eq(rating));
        }
        if let Some(min_rating) = self.min_rating {
            condition = condition.add(review::Column::Rating.gte(min_rating));
        }
        if let Some(is_approved) = self.is_approved {
            condition = condition.add(review::Column::IsApproved.eq(is_approved));
        }
        if let Some(verified) = self.verified_purchase {
            condition = condition.add(review::Column::VerifiedPurchase.eq(verified));
        }

        condition
    }

    fn matches(&self, row: &review::Model) -> bool {
        if let Some(term) = search_term(&self.search) {
            if !contains_ci(&row.title, term) && !contains_ci(&row.comment, term) {
                return false;
            }
        }
        if self.product_id.is_some_and(|v| row.product_id != v) {
            return false;
        }
        if self.user_id.is_some_and(|v| row.user_id != v) {
            return false;
        }
        if self.rating.is_some_and(|v| row.rating != v) {
            return false;
        }
        if self.min_rating.is_some_and(|min| row.rating < min) {
            return false;
        }
        if self.is_approved.is_some_and(|v| row.is_approved != v) {
            return false;
        }
        if self.verified_purchase.is_some_and(|v| row.verified_purchase != v) {
            return false;
        }
        true
    }
}

impl RowSort<review::Model> for ReviewSort {
    type Entity = review::Entity;

    fn column(self) -> review::Column {
        match self {
            ReviewSort::Rating => review::Column::Rating,
            ReviewSort::CreatedAt => review::Column::CreatedAt,
        }
    }

    fn id_column() -> review::Column {
        review::Column::Id
    }

    fn compare(self, a: &review::Model, b: &review::Model) -> Ordering {
        match self {
            ReviewSort::Rating => a.rating.cmp(&b.rating),
            ReviewSort::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}
