use sea_orm::prelude::DateTimeUtc;
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{contains_ci, contains_ci_opt, search_condition, search_term, Keyed, RowFilter, RowSort, Sort, SortKey};
use crate::entities::order::{self, PaymentStatus, Status};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFilters {
    pub search: Option<String>,
    pub status: Option<Status>,
    pub payment_status: Option<PaymentStatus>,
    pub user_id: Option<i32>,
    pub created_from: Option<DateTimeUtc>,
    pub created_to: Option<DateTimeUtc>,
    pub min_total: Option<i64>,
    pub max_total: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSort {
    OrderNumber,
    Status,
    TotalAmount,
    CreatedAt,
    UpdatedAt,
}

impl SortKey for OrderSort {
    fn default_sort() -> Sort<Self> {
        Sort::desc(OrderSort::CreatedAt)
    }
}

impl Keyed for order::Model {
    fn key(&self) -> i32 {
        self.id
    }
}

const SEARCH_COLUMNS: [order::Column; 2] = [order::Column::OrderNumber, order::Column::CustomerNotes];

impl RowFilter<order::Model> for OrderFilters {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = search_term(&self.search) {
            condition = condition.add(search_condition(&SEARCH_COLUMNS, term));
        }
        if let Some(status) = self.status {
            condition = condition.add(order::Column::Status.eq(status));
        }
        if let Some(payment_status) = self.payment_status {
            condition = condition.add(order::Column::PaymentStatus.eq(payment_status));
        }
        if let Some(user_id) = self.user_id {
            condition = condition.add(order::Column::UserId.eq(user_id));
        }
        if let Some(from) = self.created_from {
            condition = condition.add(order::Column::CreatedAt.gte(from));
        }
        if let Some(to) = self.created_to {
            condition = condition.add(order::Column::CreatedAt.lte(to));
        }
        if let Some(min_total) = self.min_total {
            condition = condition.add(order::Column::TotalAmount.gte(min_total));
        }
        if let Some(max_total) = self.max_total {
            condition = condition.add(order::Column::TotalAmount.lte(max_total));
        }

        condition
    }

    fn matches(&self, row: &order::Model) -> bool {
        if let Some(term) = search_term(&self.search) {
            if !contains_ci(&row.order_number, term)
                && !contains_ci_opt(row.customer_notes.as_deref(), term)
            {
                return false;
            }
        }
        if self.status.is_some_and(|v| row.status != v) {
            return false;
        }
        if self.payment_status.is_some_and(|v| row.payment_status != v) {
            return false;
        }
        if self.user_id.is_some_and(|v| row.user_id != v) {
            return false;
        }
        if self.created_from.is_some_and(|from| row.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| row.created_at > to) {
            return false;
        }
        if self.min_total.is_some_and(|min| row.total_amount < min) {
            return false;
        }
        if self.max_total.is_some_and(|max| row.total_amount > max) {
            return false;
        }
        true
    }
}

impl RowSort<order::Model> for OrderSort {
    type Entity = order::Entity;

    fn column(self) -> order::Column {
        match self {
            OrderSort::OrderNumber => order::Column::OrderNumber,
            OrderSort::Status => order::Column::Status,
            OrderSort::TotalAmount => order::Column::TotalAmount,
            OrderSort::CreatedAt => order::Column::CreatedAt,
            OrderSort::UpdatedAt => order::Column::UpdatedAt,
        }
    }

    fn id_column() -> order::Column {
        order::Column::Id
    }

    fn compare(self, a: &order::Model, b: &order::Model) -> Ordering {
        match self {
            OrderSort::OrderNumber => a.order_number.cmp(&b.order_number),
            // Stored as text, so the database orders statuses alphabetically.
            OrderSort::Status => a.status.as_str().cmp(b.status.as_str()),
            OrderSort::TotalAmount => a.total_amount.cmp(&b.total_amount),
            OrderSort::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}
