use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::NOT_BLANK;
use crate::entities::order::PaymentStatus;
use crate::entities::user::{self, Role};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub email_verified: bool,
    pub is_active: bool,
    pub last_login_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    #[serde(flatten)]
    pub totals: CustomerTotals,
}

impl Customer {
    pub fn assemble(row: user::Model, totals: &HashMap<i32, CustomerTotals>) -> Self {
        Self {
            totals: totals.get(&row.id).copied().unwrap_or_default(),
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            role: row.role,
            email_verified: row.email_verified,
            is_active: row.is_active,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Aggregates derived from a customer's orders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CustomerTotals {
    pub total_orders: u64,
    /// Sum over paid orders.
    pub total_spent: i64,
    pub average_order_value: i64,
}

impl CustomerTotals {
    /// Builds per-customer totals from `(user_id, payment_status, total_amount)` rows.
    pub fn by_customer(
        rows: impl IntoIterator<Item = (i32, PaymentStatus, i64)>,
    ) -> HashMap<i32, CustomerTotals> {
        let mut paid_counts: HashMap<i32, i64> = HashMap::new();
        let mut totals: HashMap<i32, CustomerTotals> = HashMap::new();

        for (user_id, payment_status, total_amount) in rows {
            let entry = totals.entry(user_id).or_default();
            entry.total_orders += 1;
            if payment_status == PaymentStatus::Paid {
                entry.total_spent += total_amount;
                *paid_counts.entry(user_id).or_insert(0) += 1;
            }
        }

        for (user_id, entry) in totals.iter_mut() {
            let paid = paid_counts.get(user_id).copied().unwrap_or(0);
            entry.average_order_value = if paid == 0 { 0 } else { entry.total_spent / paid };
        }
        totals
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomerRef {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&user::Model> for CustomerRef {
    fn from(value: &user::Model) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name.clone(),
            last_name: value.last_name.clone(),
            email: value.email.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    /// Accounts with the customer role.
    pub total_customers: u64,
    pub active_customers: u64,
    pub verified_customers: u64,
    pub admin_users: u64,
}

impl CustomerStats {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a user::Model>) -> Self {
        rows.into_iter().fold(Self::default(), |mut stats, row| {
            match row.role {
                Role::Admin => stats.admin_users += 1,
                Role::Customer => {
                    stats.total_customers += 1;
                    stats.active_customers += u64::from(row.is_active);
                    stats.verified_customers += u64::from(row.email_verified);
                }
            }
            stats
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct CustomerPatch {
    #[validate(regex(path = *NOT_BLANK, message = "first_name is required"))]
    pub first_name: Option<String>,
    #[validate(regex(path = *NOT_BLANK, message = "last_name is required"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub email_verified: Option<bool>,
    pub is_active: Option<bool>,
}

impl CustomerPatch {
    pub fn apply(self, row: &mut user::Model, now: DateTimeUtc) {
        if let Some(first_name) = self.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            row.last_name = last_name;
        }
        if let Some(email) = self.email {
            row.email = email;
        }
        if let Some(phone) = self.phone {
            row.phone = Some(phone);
        }
        if let Some(role) = self.role {
            row.role = role;
        }
        if let Some(email_verified) = self.email_verified {
            row.email_verified = email_verified;
        }
        if let Some(is_active) = self.is_active {
            row.is_active = is_active;
        }
        row.updated_at = now;
    }
}
