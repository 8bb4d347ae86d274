use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use super::{
    check_category_parent, conflict, CategoryQuery, CategorySource, CustomerQuery, CustomerSource,
    Dataset, OrderQuery, OrderSource, ProductQuery, ProductSource, ReportSource, ReviewQuery,
    ReviewSource, SettingsSource, ShippingSource,
};
use crate::entities::{product, shipping_method, shipping_zone, system_setting};
use crate::error::{StoreError, StoreResult};
use crate::models::category::count_by_category;
use crate::models::order::group_items;
use crate::models::setting::encode_value;
use crate::models::shipping::{group_methods, ShippingMethod};
use crate::models::{
    Category, CategoryPatch, CategoryStats, Customer, CustomerPatch, CustomerStats, CustomerTotals,
    DateRange, NewCategory, NewProduct, NewShippingMethod, NewShippingZone, Order, OrderStats,
    OrderUpdate, Product, ProductPatch, ProductStats, Review, ReviewStats, SalesReport, Setting,
    ShippingMethodPatch, ShippingZone, ShippingZonePatch,
};
use crate::query::{run_in_memory, Keyed, Paginated};

impl Keyed for shipping_zone::Model {
    fn key(&self) -> i32 {
        self.id
    }
}

impl Keyed for shipping_method::Model {
    fn key(&self) -> i32 {
        self.id
    }
}

impl Keyed for system_setting::Model {
    fn key(&self) -> i32 {
        self.id
    }
}

fn index<M: Keyed + Clone>(rows: &[M]) -> HashMap<i32, M> {
    rows.iter().map(|row| (row.key(), row.clone())).collect()
}

fn next_id<M: Keyed>(rows: &[M]) -> i32 {
    rows.iter().map(Keyed::key).max().unwrap_or(0) + 1
}

fn position<M: Keyed>(rows: &[M], id: i32) -> Option<usize> {
    rows.iter().position(|row| row.key() == id)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Dataset>,
}

impl MemoryStore {
    pub fn new(data: Dataset) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    pub fn sample() -> Self {
        Self::new(Dataset::sample())
    }

    pub async fn snapshot(&self) -> Dataset {
        self.data.read().await.clone()
    }
}

impl Dataset {
    fn product_view(&self, row: product::Model) -> Product {
        Product::assemble(row, &index(&self.categories))
    }

    fn check_product_unique(&self, row: &product::Model) -> StoreResult<()> {
        let others = || self.products.iter().filter(|p| p.id != row.id);
        if others().any(|p| p.slug == row.slug) {
            return Err(conflict("Product", "slug", &row.slug));
        }
        if others().any(|p| p.sku == row.sku) {
            return Err(conflict("Product", "sku", &row.sku));
        }
        match row.category_id {
            Some(category_id) if position(&self.categories, category_id).is_none() => Err(
                StoreError::Validation(format!("category {} does not exist", category_id)),
            ),
            _ => Ok(()),
        }
    }

    fn category_view(&self, row: crate::entities::category::Model) -> Category {
        let counts = count_by_category(
            self.products
                .iter()
                .filter(|p| p.category_id == Some(row.id))
                .map(|p| p.category_id),
        );
        Category::assemble(row, &counts)
    }

    fn category_links(&self) -> Vec<(i32, Option<i32>)> {
        self.categories.iter().map(|c| (c.id, c.parent_id)).collect()
    }

    fn order_views(&self, rows: Vec<crate::entities::order::Model>) -> Vec<Order> {
        let ids: HashSet<i32> = rows.iter().map(|o| o.id).collect();
        let users = index(&self.users);
        let mut items = group_items(
            self.order_items
                .iter()
                .filter(|item| ids.contains(&item.order_id))
                .cloned(),
        );
        rows.into_iter()
            .map(|row| Order::assemble(row, &users, &mut items))
            .collect()
    }

    fn customer_totals(&self) -> HashMap<i32, CustomerTotals> {
        CustomerTotals::by_customer(
            self.orders
                .iter()
                .map(|o| (o.user_id, o.payment_status, o.total_amount)),
        )
    }

    fn review_view(&self, row: crate::entities::review::Model) -> Review {
        Review::assemble(row, &index(&self.users), &index(&self.products))
    }

    fn zone_views(&self, mut zones: Vec<shipping_zone::Model>) -> Vec<ShippingZone> {
        let ids: HashSet<i32> = zones.iter().map(|z| z.id).collect();
        let mut methods = group_methods(
            self.shipping_methods
                .iter()
                .filter(|m| ids.contains(&m.zone_id))
                .cloned(),
        );
        zones.sort_by_key(|zone| (zone.sort_order, zone.id));
        zones
            .into_iter()
            .map(|zone| ShippingZone::assemble(zone, &mut methods))
            .collect()
    }

    fn check_zone_name(&self, id: i32, name: &str) -> StoreResult<()> {
        if self
            .shipping_zones
            .iter()
            .any(|zone| zone.id != id && zone.name == name)
        {
            return Err(conflict("Shipping zone", "name", name));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductSource for MemoryStore {
    async fn list_products(&self, query: &ProductQuery) -> StoreResult<Paginated<Product>> {
        let data = self.data.read().await;
        let categories = index(&data.categories);
        Ok(run_in_memory(&data.products, query).map(|row| Product::assemble(row, &categories)))
    }

    async fn product_by_id(&self, id: i32) -> StoreResult<Option<Product>> {
        let data = self.data.read().await;
        Ok(position(&data.products, id).map(|i| data.product_view(data.products[i].clone())))
    }

    async fn product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        let data = self.data.read().await;
        Ok(data
            .products
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .map(|row| data.product_view(row)))
    }

    async fn product_stats(&self) -> StoreResult<ProductStats> {
        let data = self.data.read().await;
        Ok(ProductStats::from_rows(&data.products))
    }

    async fn create_product(&self, input: NewProduct) -> StoreResult<Product> {
        let mut data = self.data.write().await;
        let row = input.into_model(next_id(&data.products), Utc::now());
        data.check_product_unique(&row)?;
        data.products.push(row.clone());
        Ok(data.product_view(row))
    }

    async fn update_product(&self, id: i32, patch: ProductPatch) -> StoreResult<Product> {
        let mut data = self.data.write().await;
        let i = position(&data.products, id).ok_or_else(|| StoreError::not_found("product", id))?;
        let mut row = data.products[i].clone();
        patch.apply(&mut row, Utc::now());
        data.check_product_unique(&row)?;
        data.products[i] = row.clone();
        Ok(data.product_view(row))
    }
}

#[async_trait]
impl CategorySource for MemoryStore {
    async fn list_categories(&self, query: &CategoryQuery) -> StoreResult<Paginated<Category>> {
        let data = self.data.read().await;
        let counts = count_by_category(data.products.iter().map(|p| p.category_id));
        Ok(run_in_memory(&data.categories, query).map(|row| Category::assemble(row, &counts)))
    }

    async fn category_by_id(&self, id: i32) -> StoreResult<Option<Category>> {
        let data = self.data.read().await;
        Ok(position(&data.categories, id).map(|i| data.category_view(data.categories[i].clone())))
    }

    async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let data = self.data.read().await;
        Ok(data
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
            .map(|row| data.category_view(row)))
    }

    async fn category_stats(&self) -> StoreResult<CategoryStats> {
        let data = self.data.read().await;
        Ok(CategoryStats::from_rows(&data.categories))
    }

    async fn create_category(&self, input: NewCategory) -> StoreResult<Category> {
        let mut data = self.data.write().await;
        if data.categories.iter().any(|c| c.slug == input.slug) {
            return Err(conflict("Category", "slug", &input.slug));
        }
        check_category_parent(data.category_links(), None, input.parent_id)?;
        let row = input.into_model(next_id(&data.categories), Utc::now());
        data.categories.push(row.clone());
        Ok(data.category_view(row))
    }

    async fn update_category(&self, id: i32, patch: CategoryPatch) -> StoreResult<Category> {
        let mut data = self.data.write().await;
        let i = position(&data.categories, id)
            .ok_or_else(|| StoreError::not_found("category", id))?;
        let moves = patch.parent_id.is_some();
        let mut row = data.categories[i].clone();
        patch.apply(&mut row, Utc::now());
        if data.categories.iter().any(|c| c.id != id && c.slug == row.slug) {
            return Err(conflict("Category", "slug", &row.slug));
        }
        if moves {
            check_category_parent(data.category_links(), Some(id), row.parent_id)?;
        }
        data.categories[i] = row.clone();
        Ok(data.category_view(row))
    }
}

#[async_trait]
impl OrderSource for MemoryStore {
    async fn list_orders(&self, query: &OrderQuery) -> StoreResult<Paginated<Order>> {
        let data = self.data.read().await;
        let page = run_in_memory(&data.orders, query);
        let items = data.order_views(page.items);
        Ok(Paginated {
            items,
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        })
    }

    async fn order_by_id(&self, id: i32) -> StoreResult<Option<Order>> {
        let data = self.data.read().await;
        let rows = data.orders.iter().filter(|o| o.id == id).cloned().collect();
        Ok(data.order_views(rows).pop())
    }

    async fn order_by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        let data = self.data.read().await;
        let rows = data
            .orders
            .iter()
            .filter(|o| o.order_number == order_number)
            .cloned()
            .collect();
        Ok(data.order_views(rows).pop())
    }

    async fn order_stats(&self) -> StoreResult<OrderStats> {
        let data = self.data.read().await;
        Ok(OrderStats::from_rows(&data.orders))
    }

    async fn update_order(&self, id: i32, update: OrderUpdate) -> StoreResult<Order> {
        let mut data = self.data.write().await;
        let i = position(&data.orders, id).ok_or_else(|| StoreError::not_found("order", id))?;
        update.apply(&mut data.orders[i], Utc::now());
        let row = data.orders[i].clone();
        data.order_views(vec![row])
            .pop()
            .ok_or_else(|| StoreError::not_found("order", id))
    }
}

#[async_trait]
impl CustomerSource for MemoryStore {
    async fn list_customers(&self, query: &CustomerQuery) -> StoreResult<Paginated<Customer>> {
        let data = self.data.read().await;
        let totals = data.customer_totals();
        Ok(run_in_memory(&data.users, query).map(|row| Customer::assemble(row, &totals)))
    }

    async fn customer_by_id(&self, id: i32) -> StoreResult<Option<Customer>> {
        let data = self.data.read().await;
        let totals = data.customer_totals();
        Ok(position(&data.users, id).map(|i| Customer::assemble(data.users[i].clone(), &totals)))
    }

    async fn customer_stats(&self) -> StoreResult<CustomerStats> {
        let data = self.data.read().await;
        Ok(CustomerStats::from_rows(&data.users))
    }

    async fn update_customer(&self, id: i32, patch: CustomerPatch) -> StoreResult<Customer> {
        let mut data = self.data.write().await;
        let i = position(&data.users, id).ok_or_else(|| StoreError::not_found("customer", id))?;
        let mut row = data.users[i].clone();
        patch.apply(&mut row, Utc::now());
        if data.users.iter().any(|u| u.id != id && u.email == row.email) {
            return Err(conflict("Customer", "email", &row.email));
        }
        data.users[i] = row.clone();
        Ok(Customer::assemble(row, &data.customer_totals()))
    }
}

#[async_trait]
impl ReviewSource for MemoryStore {
    async fn list_reviews(&self, query: &ReviewQuery) -> StoreResult<Paginated<Review>> {
        let data = self.data.read().await;
        let users = index(&data.users);
        let products = index(&data.products);
        Ok(run_in_memory(&data.reviews, query)
            .map(|row| Review::assemble(row, &users, &products)))
    }

    async fn review_by_id(&self, id: i32) -> StoreResult<Option<Review>> {
        let data = self.data.read().await;
        Ok(position(&data.reviews, id).map(|i| data.review_view(data.reviews[i].clone())))
    }

    async fn review_stats(&self) -> StoreResult<ReviewStats> {
        let data = self.data.read().await;
        Ok(ReviewStats::from_rows(&data.reviews))
    }

    async fn set_review_approval(&self, id: i32, approved: bool) -> StoreResult<Review> {
        let mut data = self.data.write().await;
        let i = position(&data.reviews, id).ok_or_else(|| StoreError::not_found("review", id))?;
        data.reviews[i].is_approved = approved;
        data.reviews[i].updated_at = Utc::now();
        let row = data.reviews[i].clone();
        Ok(data.review_view(row))
    }
}

#[async_trait]
impl ShippingSource for MemoryStore {
    async fn shipping_zones(&self) -> StoreResult<Vec<ShippingZone>> {
        let data = self.data.read().await;
        Ok(data.zone_views(data.shipping_zones.clone()))
    }

    async fn shipping_zone_by_id(&self, id: i32) -> StoreResult<Option<ShippingZone>> {
        let data = self.data.read().await;
        let rows = data
            .shipping_zones
            .iter()
            .filter(|z| z.id == id)
            .cloned()
            .collect();
        Ok(data.zone_views(rows).pop())
    }

    async fn create_shipping_zone(&self, input: NewShippingZone) -> StoreResult<ShippingZone> {
        let mut data = self.data.write().await;
        let row = input.into_model(next_id(&data.shipping_zones), Utc::now());
        data.check_zone_name(row.id, &row.name)?;
        data.shipping_zones.push(row.clone());
        data.zone_views(vec![row])
            .pop()
            .ok_or_else(|| StoreError::not_found("shipping zone", "new"))
    }

    async fn update_shipping_zone(
        &self,
        id: i32,
        patch: ShippingZonePatch,
    ) -> StoreResult<ShippingZone> {
        let mut data = self.data.write().await;
        let i = position(&data.shipping_zones, id)
            .ok_or_else(|| StoreError::not_found("shipping zone", id))?;
        let mut row = data.shipping_zones[i].clone();
        patch.apply(&mut row, Utc::now());
        data.check_zone_name(id, &row.name)?;
        data.shipping_zones[i] = row.clone();
        data.zone_views(vec![row])
            .pop()
            .ok_or_else(|| StoreError::not_found("shipping zone", id))
    }

    async fn create_shipping_method(
        &self,
        zone_id: i32,
        input: NewShippingMethod,
    ) -> StoreResult<ShippingMethod> {
        let mut data = self.data.write().await;
        if position(&data.shipping_zones, zone_id).is_none() {
            return Err(StoreError::not_found("shipping zone", zone_id));
        }
        let row = input.into_model(next_id(&data.shipping_methods), zone_id, Utc::now());
        data.shipping_methods.push(row.clone());
        Ok(row)
    }

    async fn update_shipping_method(
        &self,
        id: i32,
        patch: ShippingMethodPatch,
    ) -> StoreResult<ShippingMethod> {
        let mut data = self.data.write().await;
        let i = position(&data.shipping_methods, id)
            .ok_or_else(|| StoreError::not_found("shipping method", id))?;
        patch.apply(&mut data.shipping_methods[i], Utc::now());
        Ok(data.shipping_methods[i].clone())
    }
}

#[async_trait]
impl SettingsSource for MemoryStore {
    async fn settings(&self, category: Option<&str>) -> StoreResult<Vec<Setting>> {
        let data = self.data.read().await;
        let mut rows: Vec<system_setting::Model> = data
            .settings
            .iter()
            .filter(|s| category.map_or(true, |c| s.category == c))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(rows.into_iter().map(Setting::from).collect())
    }

    async fn setting(&self, key: &str) -> StoreResult<Option<Setting>> {
        let data = self.data.read().await;
        Ok(data
            .settings
            .iter()
            .find(|s| s.key == key)
            .cloned()
            .map(Setting::from))
    }

    async fn update_setting(&self, key: &str, value: Value) -> StoreResult<Setting> {
        let mut data = self.data.write().await;
        let row = data
            .settings
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or_else(|| StoreError::not_found("setting", key))?;
        row.value = encode_value(row.setting_type, &value).map_err(StoreError::Validation)?;
        row.updated_at = Utc::now();
        Ok(Setting::from(row.clone()))
    }
}

#[async_trait]
impl ReportSource for MemoryStore {
    async fn sales_report(&self, range: DateRange) -> StoreResult<SalesReport> {
        let data = self.data.read().await;
        Ok(SalesReport::build(range, &data.orders, &data.order_items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::order::Status;
    use crate::query::{
        CategoryFilters, CustomerFilters, OrderFilters, ProductFilters, ProductSort,
        QueryOptions, ReviewFilters, Sort,
    };
    use crate::store::testing::{priced_products, three_level_categories};
    use serde_json::json;

    #[tokio::test]
    async fn lists_sorted_and_paginated() {
        let store = MemoryStore::new(priced_products(&[100, 50, 200]));
        let query = QueryOptions::with_filters(ProductFilters {
            is_active: Some(true),
            ..Default::default()
        })
        .page(1, 2)
        .sorted(Sort::asc(ProductSort::Price))
        .normalize();

        let page = store.list_products(&query).await.expect("list");
        let prices: Vec<i64> = page.items.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![50, 100]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 1);

        let again = store.list_products(&query).await.expect("list");
        assert_eq!(page, again);
    }

    #[tokio::test]
    async fn joins_category_and_tolerates_dangling_reference() {
        let mut data = Dataset::sample();
        data.products[0].category_id = Some(999);
        let store = MemoryStore::new(data);

        let dangling = store.product_by_id(1).await.expect("get").expect("exists");
        assert_eq!(dangling.category, None);

        let joined = store.product_by_id(4).await.expect("get").expect("exists");
        assert_eq!(joined.category.map(|c| c.slug), Some("tes-e-infusiones".to_string()));
    }

    #[tokio::test]
    async fn low_stock_filter_is_exact() {
        let store = MemoryStore::sample();
        let query = QueryOptions::with_filters(ProductFilters {
            low_stock: Some(true),
            ..Default::default()
        })
        .page(1, 2)
        .normalize();

        let page = store.list_products(&query).await.expect("list");
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(Product::is_low_stock));

        let stats = store.product_stats().await.expect("stats");
        assert_eq!(stats.low_stock_products, 3);
        assert_eq!(stats.out_of_stock_products, 1);
        assert_eq!(stats.featured_products, 3);
        assert_eq!(stats.active_products, 6);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_columns() {
        let store = MemoryStore::sample();
        let query = QueryOptions::with_filters(ProductFilters {
            search: Some("GRANOLA".into()),
            ..Default::default()
        })
        .normalize();
        let page = store.list_products(&query).await.expect("list");
        assert_eq!(page.total, 1);
        assert!(page.items[0].name.to_lowercase().contains("granola"));

        let by_sku = QueryOptions::with_filters(ProductFilters {
            search: Some("beb-".into()),
            ..Default::default()
        })
        .normalize();
        assert_eq!(store.list_products(&by_sku).await.expect("list").total, 2);

        let customers = QueryOptions::with_filters(CustomerFilters {
            search: Some("ROJAS".into()),
            ..Default::default()
        })
        .normalize();
        assert_eq!(store.list_customers(&customers).await.expect("list").total, 1);

        let reviews = QueryOptions::with_filters(ReviewFilters {
            search: Some("miel".into()),
            ..Default::default()
        })
        .normalize();
        assert_eq!(store.list_reviews(&reviews).await.expect("list").total, 1);
    }

    #[tokio::test]
    async fn category_stats_and_counts() {
        let store = MemoryStore::sample();
        let stats = store.category_stats().await.expect("stats");
        assert_eq!(
            stats,
            CategoryStats {
                total_categories: 5,
                active_categories: 4,
                main_categories: 2,
                subcategories: 3,
            }
        );

        let roots = QueryOptions::with_filters(CategoryFilters {
            root_only: Some(true),
            ..Default::default()
        })
        .normalize();
        let page = store.list_categories(&roots).await.expect("list");
        let ids: Vec<i32> = page.items.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(page.items[0].products_count, 2);
    }

    #[tokio::test]
    async fn category_moves_are_checked() {
        let store = MemoryStore::new(three_level_categories());
        let cycle = CategoryPatch {
            parent_id: Some(Some(3)),
            ..Default::default()
        };
        assert!(matches!(
            store.update_category(1, cycle).await,
            Err(StoreError::CategoryCycle { .. })
        ));

        let missing = NewCategory {
            name: "Huérfana".into(),
            slug: "huerfana".into(),
            description: None,
            image_url: None,
            parent_id: Some(42),
            sort_order: 0,
            is_active: true,
        };
        assert!(matches!(
            store.create_category(missing).await,
            Err(StoreError::Validation(_))
        ));

        let to_root = CategoryPatch {
            parent_id: Some(None),
            ..Default::default()
        };
        let moved = store.update_category(3, to_root).await.expect("move");
        assert_eq!(moved.parent_id, None);
    }

    #[tokio::test]
    async fn order_totals_are_never_recomputed() {
        let store = MemoryStore::sample();
        let before = store.order_by_id(3).await.expect("get").expect("exists");
        assert_eq!(before.total_amount, 30_000);
        assert_eq!(before.order_items.len(), 1);
        assert_eq!(before.customer.as_ref().map(|c| c.id), Some(2));

        let after = store
            .update_order(3, OrderUpdate::status(Status::Shipped))
            .await
            .expect("update");
        assert_eq!(after.total_amount, 30_000);
        assert_eq!(after.status, Status::Shipped);
        assert!(after.shipped_at.is_some());
    }

    #[tokio::test]
    async fn order_stats_count_paid_revenue_only() {
        let store = MemoryStore::sample();
        let stats = store.order_stats().await.expect("stats");
        assert_eq!(stats.total_orders, 6);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.cancelled_orders, 1);
        assert_eq!(stats.total_revenue, 63_692 + 47_625 + 30_000);
        assert_eq!(stats.average_order_value, (63_692 + 47_625 + 30_000) / 3);

        let paid = QueryOptions::with_filters(OrderFilters {
            status: Some(Status::Pending),
            ..Default::default()
        })
        .normalize();
        assert_eq!(store.list_orders(&paid).await.expect("list").total, 1);
    }

    #[tokio::test]
    async fn customers_carry_order_totals() {
        let store = MemoryStore::sample();
        let customer = store.customer_by_id(2).await.expect("get").expect("exists");
        assert_eq!(customer.totals.total_orders, 2);
        assert_eq!(customer.totals.total_spent, 93_692);
        assert_eq!(customer.totals.average_order_value, 46_846);

        let stats = store.customer_stats().await.expect("stats");
        assert_eq!(stats.total_customers, 4);
        assert_eq!(stats.admin_users, 1);
        assert_eq!(stats.active_customers, 3);
        assert_eq!(stats.verified_customers, 2);
    }

    #[tokio::test]
    async fn duplicate_slugs_conflict() {
        let store = MemoryStore::sample();
        let patch = ProductPatch {
            slug: Some("kombucha-maracuya".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_product(1, patch).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn settings_are_checked_against_their_type() {
        let store = MemoryStore::sample();
        assert!(matches!(
            store.update_setting("maintenance_mode", json!("quizás")).await,
            Err(StoreError::Validation(_))
        ));
        let updated = store
            .update_setting("maintenance_mode", json!(true))
            .await
            .expect("update");
        assert_eq!(updated.value, json!(true));

        let checkout = store.settings(Some("checkout")).await.expect("settings");
        let keys: Vec<&str> = checkout.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["free_shipping_threshold", "tax_rate"]);
    }

    #[tokio::test]
    async fn shipping_zones_own_sorted_methods() {
        let store = MemoryStore::sample();
        let created = store
            .create_shipping_method(
                1,
                NewShippingMethod {
                    name: "Recogida en tienda".into(),
                    description: None,
                    price: 0,
                    estimated_days: "0".into(),
                    sort_order: 0,
                    is_active: true,
                },
            )
            .await
            .expect("create");
        let zone = store
            .shipping_zone_by_id(1)
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(zone.methods.first().map(|m| m.id), Some(created.id));
        assert_eq!(zone.methods.len(), 3);

        assert!(matches!(
            store
                .create_shipping_method(
                    9,
                    NewShippingMethod {
                        name: "Nada".into(),
                        description: None,
                        price: 0,
                        estimated_days: "1".into(),
                        sort_order: 0,
                        is_active: true,
                    },
                )
                .await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
