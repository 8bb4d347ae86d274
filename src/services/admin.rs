//! The facade the admin API talks to.
//!
//! Reads never fail: store errors are logged and turned into an empty page,
//! `None` or zeroed stats. Mutations validate their payload and report the
//! outcome as an [`ActionResult`].

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::catalog::CategoryNode;
use crate::error::{StoreError, StoreResult};
use crate::models::shipping::ShippingMethod;
use crate::models::{
    ActionResult, Category, CategoryPatch, CategoryStats, Customer, CustomerPatch, CustomerStats,
    DashboardOverview, DateRange, NewCategory, NewProduct, NewShippingMethod, NewShippingZone,
    Order, OrderStats, OrderUpdate, Product, ProductPatch, ProductStats, Review, ReviewStats,
    SalesReport, Setting, ShippingMethodPatch, ShippingZone, ShippingZonePatch,
};
use crate::orders::{check_transition, TransitionPolicy};
use crate::query::{
    CategoryFilters, CategorySort, CustomerFilters, CustomerSort, OrderFilters, OrderSort,
    Paginated, ProductFilters, ProductSort, QueryOptions, ReviewFilters, ReviewSort,
};
use crate::store::DataSource;

const DASHBOARD_ROWS: u64 = 5;

#[derive(Clone)]
pub struct AdminService {
    source: Arc<dyn DataSource>,
    policy: TransitionPolicy,
}

impl AdminService {
    pub fn new(source: Arc<dyn DataSource>, policy: TransitionPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    // Products

    pub async fn products(
        &self,
        options: QueryOptions<ProductFilters, ProductSort>,
    ) -> Paginated<Product> {
        let query = options.normalize();
        listed("products", query.page, self.source.list_products(&query).await)
    }

    pub async fn product(&self, id: i32) -> Option<Product> {
        found("product", self.source.product_by_id(id).await)
    }

    pub async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        found("product", self.source.product_by_slug(slug).await)
    }

    pub async fn products_by_category(&self, category_id: i32, limit: u64) -> Vec<Product> {
        or_default(
            "products_by_category",
            self.source.products_by_category(category_id, limit).await,
        )
    }

    pub async fn featured_products(&self, limit: u64) -> Vec<Product> {
        or_default("featured_products", self.source.featured_products(limit).await)
    }

    pub async fn low_stock_products(&self, limit: u64) -> Vec<Product> {
        or_default("low_stock_products", self.source.low_stock_products(limit).await)
    }

    pub async fn product_stats(&self) -> ProductStats {
        or_default("product_stats", self.source.product_stats().await)
    }

    pub async fn create_product(&self, input: NewProduct) -> ActionResult<Product> {
        let result = match validated(&input) {
            Ok(()) => self.source.create_product(input).await,
            Err(err) => Err(err),
        };
        action("create_product", result)
    }

    pub async fn update_product(&self, id: i32, patch: ProductPatch) -> ActionResult<Product> {
        let result = match validated(&patch) {
            Ok(()) => self.source.update_product(id, patch).await,
            Err(err) => Err(err),
        };
        action("update_product", result)
    }

    /// Sets the absolute stock level of a product.
    pub async fn adjust_stock(&self, id: i32, stock_quantity: i32) -> ActionResult<Product> {
        self.update_product(id, ProductPatch::stock(stock_quantity))
            .await
    }

    // Categories

    pub async fn categories(
        &self,
        options: QueryOptions<CategoryFilters, CategorySort>,
    ) -> Paginated<Category> {
        let query = options.normalize();
        listed("categories", query.page, self.source.list_categories(&query).await)
    }

    pub async fn category(&self, id: i32) -> Option<Category> {
        found("category", self.source.category_by_id(id).await)
    }

    pub async fn category_by_slug(&self, slug: &str) -> Option<Category> {
        found("category", self.source.category_by_slug(slug).await)
    }

    /// Every category nested under its parent.
    pub async fn category_tree(&self) -> Vec<CategoryNode> {
        CategoryNode::nest(or_default(
            "category_tree",
            self.source.all_categories().await,
        ))
    }

    pub async fn category_stats(&self) -> CategoryStats {
        or_default("category_stats", self.source.category_stats().await)
    }

    pub async fn create_category(&self, input: NewCategory) -> ActionResult<Category> {
        let result = match validated(&input) {
            Ok(()) => self.source.create_category(input).await,
            Err(err) => Err(err),
        };
        action("create_category", result)
    }

    pub async fn update_category(&self, id: i32, patch: CategoryPatch) -> ActionResult<Category> {
        let result = match validated(&patch) {
            Ok(()) => self.source.update_category(id, patch).await,
            Err(err) => Err(err),
        };
        action("update_category", result)
    }

    // Orders

    pub async fn orders(&self, options: QueryOptions<OrderFilters, OrderSort>) -> Paginated<Order> {
        let query = options.normalize();
        listed("orders", query.page, self.source.list_orders(&query).await)
    }

    pub async fn order(&self, id: i32) -> Option<Order> {
        found("order", self.source.order_by_id(id).await)
    }

    pub async fn order_by_number(&self, order_number: &str) -> Option<Order> {
        found("order", self.source.order_by_number(order_number).await)
    }

    pub async fn recent_orders(&self, limit: u64) -> Vec<Order> {
        or_default("recent_orders", self.source.recent_orders(limit).await)
    }

    pub async fn customer_orders(
        &self,
        user_id: i32,
        options: QueryOptions<OrderFilters, OrderSort>,
    ) -> Paginated<Order> {
        let page = options.clone().normalize().page;
        listed(
            "customer_orders",
            page,
            self.source.customer_orders(user_id, options).await,
        )
    }

    pub async fn order_stats(&self) -> OrderStats {
        or_default("order_stats", self.source.order_stats().await)
    }

    /// Applies an order update once its status change is allowed by the
    /// configured policy.
    pub async fn update_order(&self, id: i32, update: OrderUpdate) -> ActionResult<Order> {
        action("update_order", self.try_update_order(id, update).await)
    }

    async fn try_update_order(&self, id: i32, update: OrderUpdate) -> StoreResult<Order> {
        validated(&update)?;
        if let Some(to) = update.status {
            let current = self
                .source
                .order_by_id(id)
                .await?
                .ok_or_else(|| StoreError::not_found("order", id))?;
            check_transition(self.policy, current.status, to)?;
        }
        self.source.update_order(id, update).await
    }

    // Customers

    pub async fn customers(
        &self,
        options: QueryOptions<CustomerFilters, CustomerSort>,
    ) -> Paginated<Customer> {
        let query = options.normalize();
        listed("customers", query.page, self.source.list_customers(&query).await)
    }

    pub async fn customer(&self, id: i32) -> Option<Customer> {
        found("customer", self.source.customer_by_id(id).await)
    }

    pub async fn customer_stats(&self) -> CustomerStats {
        or_default("customer_stats", self.source.customer_stats().await)
    }

    pub async fn update_customer(&self, id: i32, patch: CustomerPatch) -> ActionResult<Customer> {
        let result = match validated(&patch) {
            Ok(()) => self.source.update_customer(id, patch).await,
            Err(err) => Err(err),
        };
        action("update_customer", result)
    }

    // Reviews

    pub async fn reviews(
        &self,
        options: QueryOptions<ReviewFilters, ReviewSort>,
    ) -> Paginated<Review> {
        let query = options.normalize();
        listed("reviews", query.page, self.source.list_reviews(&query).await)
    }

    pub async fn review(&self, id: i32) -> Option<Review> {
        found("review", self.source.review_by_id(id).await)
    }

    pub async fn review_stats(&self) -> ReviewStats {
        or_default("review_stats", self.source.review_stats().await)
    }

    pub async fn approve_review(&self, id: i32) -> ActionResult<Review> {
        action("approve_review", self.source.set_review_approval(id, true).await)
    }

    pub async fn reject_review(&self, id: i32) -> ActionResult<Review> {
        action("reject_review", self.source.set_review_approval(id, false).await)
    }

    // Shipping

    pub async fn shipping_zones(&self) -> Vec<ShippingZone> {
        or_default("shipping_zones", self.source.shipping_zones().await)
    }

    pub async fn shipping_zone(&self, id: i32) -> Option<ShippingZone> {
        found("shipping zone", self.source.shipping_zone_by_id(id).await)
    }

    pub async fn create_shipping_zone(&self, input: NewShippingZone) -> ActionResult<ShippingZone> {
        let result = match validated(&input) {
            Ok(()) => self.source.create_shipping_zone(input).await,
            Err(err) => Err(err),
        };
        action("create_shipping_zone", result)
    }

    pub async fn update_shipping_zone(
        &self,
        id: i32,
        patch: ShippingZonePatch,
    ) -> ActionResult<ShippingZone> {
        let result = match validated(&patch) {
            Ok(()) => self.source.update_shipping_zone(id, patch).await,
            Err(err) => Err(err),
        };
        action("update_shipping_zone", result)
    }

    pub async fn create_shipping_method(
        &self,
        zone_id: i32,
        input: NewShippingMethod,
    ) -> ActionResult<ShippingMethod> {
        let result = match validated(&input) {
            Ok(()) => self.source.create_shipping_method(zone_id, input).await,
            Err(err) => Err(err),
        };
        action("create_shipping_method", result)
    }

    pub async fn update_shipping_method(
        &self,
        id: i32,
        patch: ShippingMethodPatch,
    ) -> ActionResult<ShippingMethod> {
        let result = match validated(&patch) {
            Ok(()) => self.source.update_shipping_method(id, patch).await,
            Err(err) => Err(err),
        };
        action("update_shipping_method", result)
    }

    // Settings

    pub async fn settings(&self, category: Option<&str>) -> Vec<Setting> {
        or_default("settings", self.source.settings(category).await)
    }

    pub async fn setting(&self, key: &str) -> Option<Setting> {
        found("setting", self.source.setting(key).await)
    }

    pub async fn update_setting(&self, key: &str, value: Value) -> ActionResult<Setting> {
        action("update_setting", self.source.update_setting(key, value).await)
    }

    // Reports

    pub async fn sales_report(&self, range: DateRange) -> SalesReport {
        let report = or_default("sales_report", self.source.sales_report(range).await);
        SalesReport { range, ..report }
    }

    pub async fn dashboard(&self) -> DashboardOverview {
        let (products, categories, orders, customers, reviews, recent_orders, low_stock) = tokio::join!(
            self.product_stats(),
            self.category_stats(),
            self.order_stats(),
            self.customer_stats(),
            self.review_stats(),
            self.recent_orders(DASHBOARD_ROWS),
            self.low_stock_products(DASHBOARD_ROWS),
        );
        DashboardOverview {
            products,
            categories,
            orders,
            customers,
            reviews,
            recent_orders,
            low_stock,
        }
    }
}

fn validated<P: Validate>(payload: &P) -> StoreResult<()> {
    payload.validate().map_err(StoreError::from)
}

fn listed<T>(entity: &'static str, page: u64, result: StoreResult<Paginated<T>>) -> Paginated<T> {
    result.unwrap_or_else(|err| {
        warn!(error = %err, entity, "Failed to list, returning an empty page");
        Paginated::empty(page)
    })
}

fn found<T>(entity: &'static str, result: StoreResult<Option<T>>) -> Option<T> {
    result.unwrap_or_else(|err| {
        warn!(error = %err, entity, "Lookup failed");
        None
    })
}

fn or_default<T: Default>(operation: &'static str, result: StoreResult<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(error = %err, operation, "Read failed, returning defaults");
        T::default()
    })
}

fn action<T>(operation: &'static str, result: StoreResult<T>) -> ActionResult<T> {
    match result {
        Ok(data) => {
            info!(operation, "Mutation applied");
            ActionResult::ok(data)
        }
        Err(err) => {
            warn!(error = %err, operation, "Mutation rejected");
            ActionResult::failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::order::{PaymentStatus, Status};
    use crate::store::{DatabaseStore, MemoryStore};
    use sea_orm::Database;

    fn service(policy: TransitionPolicy) -> AdminService {
        AdminService::new(Arc::new(MemoryStore::sample()), policy)
    }

    /// A database without tables, not backed by any fallback.
    async fn failing_service() -> AdminService {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        AdminService::new(
            Arc::new(DatabaseStore::new(Arc::new(db))),
            TransitionPolicy::default(),
        )
    }

    #[tokio::test]
    async fn reads_never_surface_store_errors() {
        let service = failing_service().await;

        let page = service
            .products(QueryOptions::default().page(3, 10))
            .await;
        assert_eq!(page, Paginated::empty(3));
        assert_eq!(service.product(1).await, None);
        assert_eq!(service.order_by_number("ORD-2024-0001").await, None);
        assert_eq!(service.category_stats().await, CategoryStats::default());
        assert!(service.category_tree().await.is_empty());
        assert!(service.settings(None).await.is_empty());

        let result = service.approve_review(1).await;
        assert!(!result.success);
        assert!(result.error.is_some_and(|e| e.starts_with("Database error")));
    }

    #[tokio::test]
    async fn strict_policy_rejects_skipped_steps() {
        let service = service(TransitionPolicy::Strict);

        let skipped = service
            .update_order(4, OrderUpdate::status(Status::Shipped))
            .await;
        assert!(!skipped.success);
        assert_eq!(
            skipped.error.as_deref(),
            Some("Cannot move order from pending to shipped")
        );

        let confirmed = service
            .update_order(4, OrderUpdate::status(Status::Confirmed))
            .await;
        assert!(confirmed.success);
        assert_eq!(confirmed.data.map(|o| o.status), Some(Status::Confirmed));

        let reopened = service
            .update_order(5, OrderUpdate::status(Status::Pending))
            .await;
        assert!(!reopened.success);
    }

    #[tokio::test]
    async fn permissive_policy_accepts_any_status() {
        let service = service(TransitionPolicy::Permissive);
        let result = service
            .update_order(5, OrderUpdate::status(Status::Pending))
            .await;
        assert!(result.success);

        let payment = OrderUpdate {
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };
        let result = service.update_order(4, payment).await;
        assert_eq!(
            result.data.map(|o| (o.payment_status, o.total_amount)),
            Some((PaymentStatus::Paid, 24_065))
        );

        let missing = service
            .update_order(404, OrderUpdate::status(Status::Shipped))
            .await;
        assert_eq!(
            missing.error.as_deref(),
            Some("No order with 404 id was found.")
        );
    }

    #[tokio::test]
    async fn payloads_are_validated_before_reaching_the_store() {
        let service = service(TransitionPolicy::default());

        let negative = service.adjust_stock(1, -3).await;
        assert!(!negative.success);
        assert!(negative
            .error
            .is_some_and(|e| e.contains("stock_quantity must not be negative")));
        assert_eq!(service.product(1).await.map(|p| p.stock_quantity), Some(42));

        let bad_slug = CategoryPatch {
            slug: Some("Con Espacios".into()),
            ..Default::default()
        };
        assert!(!service.update_category(2, bad_slug).await.success);

        let restocked = service.adjust_stock(2, 60).await;
        assert!(restocked.success);
        assert_eq!(service.product_stats().await.low_stock_products, 2);
    }

    #[tokio::test]
    async fn review_moderation() {
        let service = service(TransitionPolicy::default());
        assert_eq!(service.review_stats().await.pending_reviews, 2);

        let approved = service.approve_review(3).await;
        assert_eq!(approved.data.map(|r| r.is_approved), Some(true));
        assert_eq!(service.review_stats().await.pending_reviews, 1);

        let rejected = service.reject_review(1).await;
        assert_eq!(rejected.data.map(|r| r.is_approved), Some(false));
    }

    #[tokio::test]
    async fn category_tree_nests_children() {
        let service = service(TransitionPolicy::default());
        let tree = service.category_tree().await;

        let roots: Vec<&str> = tree.iter().map(|n| n.category.slug.as_str()).collect();
        assert_eq!(roots.len(), 2);
        let snacks = tree
            .iter()
            .find(|n| n.category.id == 1)
            .expect("snacks root");
        let children: Vec<i32> = snacks.children.iter().map(|n| n.category.id).collect();
        assert_eq!(children.len(), 2);
        assert!(children.contains(&2) && children.contains(&5));
    }

    #[tokio::test]
    async fn dashboard_combines_stats_and_lists() {
        let service = service(TransitionPolicy::default());
        let overview = service.dashboard().await;

        assert_eq!(overview.products.total_products, 7);
        assert_eq!(overview.categories.total_categories, 5);
        assert_eq!(overview.orders.total_orders, 6);
        assert_eq!(overview.customers.total_customers, 5);
        assert_eq!(overview.reviews.total_reviews, 4);

        assert_eq!(overview.recent_orders.len(), 5);
        assert_eq!(overview.recent_orders[0].order_number, "ORD-2024-0006");
        let low: Vec<i32> = overview.low_stock.iter().map(|p| p.stock_quantity).collect();
        assert_eq!(low, vec![0, 5, 6]);
    }

    #[tokio::test]
    async fn sales_report_keeps_the_requested_range() {
        let service = failing_service().await;
        let range = DateRange {
            from: None,
            to: Some(chrono::Utc::now()),
        };
        let report = service.sales_report(range).await;
        assert_eq!(report.range, range);
        assert_eq!(report.total_orders, 0);
    }
}
