use chrono::NaiveDate;
use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::order::OrderItem;
use super::{CategoryStats, CustomerStats, Order, OrderStats, Product, ProductStats, ReviewStats};
use crate::entities::order::{self, PaymentStatus, Status};
use crate::query::OrderFilters;

const TOP_PRODUCTS: usize = 5;

/// Inclusive bounds on `created_at`. Open ends are unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTimeUtc>,
    pub to: Option<DateTimeUtc>,
}

impl DateRange {
    pub fn contains(&self, at: DateTimeUtc) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }

    pub fn order_filters(&self) -> OrderFilters {
        OrderFilters {
            created_from: self.from,
            created_to: self.to,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub orders: u64,
    pub revenue: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: Status,
    pub label: &'static str,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: Option<i32>,
    pub product_name: String,
    pub quantity: i64,
    pub revenue: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub range: DateRange,
    pub total_orders: u64,
    pub paid_orders: u64,
    /// Sum of `total_amount` over paid orders.
    pub total_revenue: i64,
    pub average_order_value: i64,
    pub daily: Vec<DailySales>,
    pub status_breakdown: Vec<StatusCount>,
    pub top_products: Vec<TopProduct>,
}

impl SalesReport {
    /// Builds the report from the orders in `range` and their line items.
    /// Rows outside the range are ignored, as are items of cancelled orders
    /// when ranking products.
    pub fn build(range: DateRange, orders: &[order::Model], items: &[OrderItem]) -> Self {
        let orders: Vec<&order::Model> = orders
            .iter()
            .filter(|order| range.contains(order.created_at))
            .collect();

        let mut report = SalesReport {
            range,
            total_orders: orders.len() as u64,
            ..Default::default()
        };

        let mut daily: BTreeMap<NaiveDate, DailySales> = BTreeMap::new();
        let mut by_status: HashMap<Status, u64> = HashMap::new();
        for order in &orders {
            *by_status.entry(order.status).or_insert(0) += 1;

            let date = order.created_at.date_naive();
            let day = daily.entry(date).or_insert_with(|| DailySales {
                date,
                orders: 0,
                revenue: 0,
            });
            day.orders += 1;

            if order.payment_status == PaymentStatus::Paid {
                report.paid_orders += 1;
                report.total_revenue += order.total_amount;
                day.revenue += order.total_amount;
            }
        }
        report.average_order_value = match report.paid_orders {
            0 => 0,
            paid => report.total_revenue / paid as i64,
        };
        report.daily = daily.into_values().collect();
        report.status_breakdown = Status::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                label: status.label(),
                count: by_status.get(&status).copied().unwrap_or(0),
            })
            .collect();

        let counted: HashSet<i32> = orders
            .iter()
            .filter(|order| order.status != Status::Cancelled)
            .map(|order| order.id)
            .collect();
        report.top_products = top_products(
            items.iter().filter(|item| counted.contains(&item.order_id)),
        );

        report
    }
}

fn top_products<'a>(items: impl Iterator<Item = &'a OrderItem>) -> Vec<TopProduct> {
    let mut ranked: Vec<TopProduct> = Vec::new();
    let mut index: HashMap<ProductKey, usize> = HashMap::new();
    for item in items {
        let key = match item.product_id {
            Some(id) => ProductKey::Id(id),
            // Items whose product is gone are grouped by name.
            None => ProductKey::Name(item.product_name.clone()),
        };
        let slot = *index.entry(key).or_insert_with(|| {
            ranked.push(TopProduct {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity: 0,
                revenue: 0,
            });
            ranked.len() - 1
        });
        ranked[slot].quantity += i64::from(item.quantity);
        ranked[slot].revenue += item.total_price;
    }

    ranked.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| b.revenue.cmp(&a.revenue))
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    ranked.truncate(TOP_PRODUCTS);
    ranked
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ProductKey {
    Id(i32),
    Name(String),
}

/// Everything the dashboard landing page shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub products: ProductStats,
    pub categories: CategoryStats,
    pub orders: OrderStats,
    pub customers: CustomerStats,
    pub reviews: ReviewStats,
    pub recent_orders: Vec<Order>,
    pub low_stock: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Dataset;
    use chrono::{TimeZone, Utc};

    #[test]
    fn whole_history() {
        let data = Dataset::sample();
        let report = SalesReport::build(DateRange::default(), &data.orders, &data.order_items);

        assert_eq!(report.total_orders, 6);
        assert_eq!(report.paid_orders, 3);
        assert_eq!(report.total_revenue, 63_692 + 47_625 + 30_000);
        assert_eq!(report.average_order_value, 141_317 / 3);
        assert_eq!(report.status_breakdown.len(), Status::ALL.len());
        assert!(report.status_breakdown.iter().all(|s| s.count == 1));

        let busiest = report
            .daily
            .iter()
            .find(|day| day.orders == 2)
            .expect("two orders on one day");
        assert_eq!(busiest.date, NaiveDate::from_ymd_opt(2024, 6, 5).expect("date"));
        assert_eq!(busiest.revenue, 77_625);
    }

    #[test]
    fn top_products_skip_cancelled_orders() {
        let data = Dataset::sample();
        let report = SalesReport::build(DateRange::default(), &data.orders, &data.order_items);

        let ranking: Vec<(Option<i32>, i64)> = report
            .top_products
            .iter()
            .map(|p| (p.product_id, p.quantity))
            .collect();
        // Equal quantities rank by revenue.
        assert_eq!(
            ranking,
            vec![(Some(4), 4), (Some(2), 3), (Some(1), 2), (Some(5), 2), (Some(7), 1)]
        );
        assert!(report.top_products.iter().all(|p| p.product_id != Some(6)));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let data = Dataset::sample();
        let range = DateRange {
            from: Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).single(),
            to: Utc.with_ymd_and_hms(2024, 6, 7, 9, 0, 0).single(),
        };
        let report = SalesReport::build(range, &data.orders, &data.order_items);

        assert_eq!(report.total_orders, 3);
        assert_eq!(report.paid_orders, 2);
        assert_eq!(report.total_revenue, 77_625);
        assert_eq!(report.daily.len(), 2);
    }

    #[test]
    fn items_without_product_group_by_name() {
        let mut data = Dataset::sample();
        for item in data.order_items.iter_mut().filter(|i| i.product_id == Some(4)) {
            item.product_id = None;
        }
        let report = SalesReport::build(DateRange::default(), &data.orders, &data.order_items);

        assert_eq!(report.top_products[0].product_id, None);
        assert_eq!(report.top_products[0].quantity, 4);
    }
}
