use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{contains_ci, search_condition, search_term, Keyed, RowFilter, RowSort, Sort, SortKey};
use crate::entities::user::{self, Role};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFilters {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub email_verified: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSort {
    FirstName,
    LastName,
    Email,
    LastLoginAt,
    CreatedAt,
}

impl SortKey for CustomerSort {
    fn default_sort() -> Sort<Self> {
        Sort::desc(CustomerSort::CreatedAt)
    }
}

impl Keyed for user::Model {
    fn key(&self) -> i32 {
        self.id
    }
}

const SEARCH_COLUMNS: [user::Column; 3] = [
    user::Column::FirstName,
    user::Column::LastName,
    user::Column::Email,
];

impl RowFilter<user::Model> for CustomerFilters {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = search_term(&self.search) {
            condition = condition.add(search_condition(&SEARCH_COLUMNS, term));
        }
        if let Some(role) = self.role {
            condition = condition.add(user::Column::Role.eq(role));
        }
        if let Some(is_active) = self.is_active {
            condition = condition.add(user::Column::IsActive.eq(is_active));
        }
        if let Some(email_verified) = self.email_verified {
            condition = condition.add(user::Column::EmailVerified.eq(email_verified));
        }

        condition
    }

    fn matches(&self, row: &user::Model) -> bool {
        if let Some(term) = search_term(&self.search) {
            if !contains_ci(&row.first_name, term)
                && !contains_ci(&row.last_name, term)
                && !contains_ci(&row.email, term)
            {
                return false;
            }
        }
        if self.role.is_some_and(|v| row.role != v) {
            return false;
        }
        if self.is_active.is_some_and(|v| row.is_active != v) {
            return false;
        }
        if self.email_verified.is_some_and(|v| row.email_verified != v) {
            return false;
        }
        true
    }
}

impl RowSort<user::Model> for CustomerSort {
    type Entity = user::Entity;

    fn column(self) -> user::Column {
        match self {
            CustomerSort::FirstName => user::Column::FirstName,
            CustomerSort::LastName => user::Column::LastName,
            CustomerSort::Email => user::Column::Email,
            CustomerSort::LastLoginAt => user::Column::LastLoginAt,
            CustomerSort::CreatedAt => user::Column::CreatedAt,
        }
    }

    fn id_column() -> user::Column {
        user::Column::Id
    }

    fn compare(self, a: &user::Model, b: &user::Model) -> Ordering {
        match self {
            CustomerSort::FirstName => a.first_name.cmp(&b.first_name),
            CustomerSort::LastName => a.last_name.cmp(&b.last_name),
            CustomerSort::Email => a.email.cmp(&b.email),
            // Never-logged-in users sort first, like NULLs in ascending SQL order.
            CustomerSort::LastLoginAt => a.last_login_at.cmp(&b.last_login_at),
            CustomerSort::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}
