use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::{CustomerRef, NOT_BLANK};
use crate::entities::order::{self, PaymentStatus, Status};
use crate::entities::types::Address;
use crate::entities::{order_item, user};

pub type OrderItem = order_item::Model;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Order {
    pub id: i32,
    pub order_number: String,
    pub user_id: i32,
    pub status: Status,
    pub payment_status: PaymentStatus,
    pub subtotal: i64,
    pub tax_amount: i64,
    pub shipping_amount: i64,
    pub discount_amount: i64,
    /// As stored. Never recomputed from the other amounts.
    pub total_amount: i64,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub tracking_number: Option<String>,
    pub customer_notes: Option<String>,
    pub admin_notes: Option<String>,
    pub customer: Option<CustomerRef>,
    pub order_items: Vec<OrderItem>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub shipped_at: Option<DateTimeUtc>,
    pub delivered_at: Option<DateTimeUtc>,
}

impl Order {
    pub fn assemble(
        row: order::Model,
        customers: &HashMap<i32, user::Model>,
        items: &mut HashMap<i32, Vec<OrderItem>>,
    ) -> Self {
        Self {
            customer: customers.get(&row.user_id).map(CustomerRef::from),
            order_items: items.remove(&row.id).unwrap_or_default(),
            id: row.id,
            order_number: row.order_number,
            user_id: row.user_id,
            status: row.status,
            payment_status: row.payment_status,
            subtotal: row.subtotal,
            tax_amount: row.tax_amount,
            shipping_amount: row.shipping_amount,
            discount_amount: row.discount_amount,
            total_amount: row.total_amount,
            billing_address: row.billing_address,
            shipping_address: row.shipping_address,
            tracking_number: row.tracking_number,
            customer_notes: row.customer_notes,
            admin_notes: row.admin_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            shipped_at: row.shipped_at,
            delivered_at: row.delivered_at,
        }
    }
}

/// Groups line items by order id, keeping their id order.
pub fn group_items(items: impl IntoIterator<Item = OrderItem>) -> HashMap<i32, Vec<OrderItem>> {
    let mut grouped: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for item in items {
        grouped.entry(item.order_id).or_default().push(item);
    }
    for items in grouped.values_mut() {
        items.sort_by_key(|item| item.id);
    }
    grouped
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub confirmed_orders: u64,
    pub processing_orders: u64,
    pub shipped_orders: u64,
    pub delivered_orders: u64,
    pub cancelled_orders: u64,
    /// Sum of `total_amount` over paid orders.
    pub total_revenue: i64,
    pub average_order_value: i64,
}

impl OrderStats {
    pub fn count_status(&mut self, status: Status, count: u64) {
        match status {
            Status::Pending => self.pending_orders += count,
            Status::Confirmed => self.confirmed_orders += count,
            Status::Processing => self.processing_orders += count,
            Status::Shipped => self.shipped_orders += count,
            Status::Delivered => self.delivered_orders += count,
            Status::Cancelled => self.cancelled_orders += count,
        }
    }

    /// Revenue figures from the totals of paid orders.
    pub fn with_revenue(mut self, paid_totals: impl IntoIterator<Item = i64>) -> Self {
        let (count, sum) = paid_totals
            .into_iter()
            .fold((0i64, 0i64), |(count, sum), total| (count + 1, sum + total));
        self.total_revenue = sum;
        self.average_order_value = if count == 0 { 0 } else { sum / count };
        self
    }

    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a order::Model> + Clone) -> Self {
        let mut stats = Self::default();
        for row in rows.clone() {
            stats.total_orders += 1;
            stats.count_status(row.status, 1);
        }
        stats.with_revenue(
            rows.into_iter()
                .filter(|row| row.payment_status == PaymentStatus::Paid)
                .map(|row| row.total_amount),
        )
    }
}

/// Administrative changes to an order. Amounts cannot be edited.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct OrderUpdate {
    pub status: Option<Status>,
    pub payment_status: Option<PaymentStatus>,
    #[validate(regex(path = *NOT_BLANK, message = "tracking_number must not be empty"))]
    pub tracking_number: Option<String>,
    pub admin_notes: Option<String>,
}

impl OrderUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Applies the changes. The first move to shipped or delivered stamps the
    /// matching timestamp.
    pub fn apply(self, row: &mut order::Model, now: DateTimeUtc) {
        if let Some(status) = self.status {
            row.status = status;
            match status {
                Status::Shipped if row.shipped_at.is_none() => row.shipped_at = Some(now),
                Status::Delivered if row.delivered_at.is_none() => row.delivered_at = Some(now),
                _ => {}
            }
        }
        if let Some(payment_status) = self.payment_status {
            row.payment_status = payment_status;
        }
        if let Some(tracking_number) = self.tracking_number {
            row.tracking_number = Some(tracking_number);
        }
        if let Some(admin_notes) = self.admin_notes {
            row.admin_notes = Some(admin_notes);
        }
        row.updated_at = now;
    }
}
