use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{
    CategoryQuery, CategorySource, CustomerQuery, CustomerSource, OrderQuery, OrderSource,
    ProductQuery, ProductSource, ReportSource, ReviewQuery, ReviewSource, SettingsSource,
    ShippingSource,
};
use crate::error::StoreResult;
use crate::models::shipping::ShippingMethod;
use crate::models::{
    Category, CategoryPatch, CategoryStats, Customer, CustomerPatch, CustomerStats, DateRange,
    NewCategory, NewProduct, NewShippingMethod, NewShippingZone, Order, OrderStats, OrderUpdate,
    Product, ProductPatch, ProductStats, Review, ReviewStats, SalesReport, Setting,
    ShippingMethodPatch, ShippingZone, ShippingZonePatch,
};
use crate::query::Paginated;

/// Reads from `primary`; when it fails, logs and replays the same read on
/// `fallback`. Writes only ever reach `primary`.
#[derive(Debug)]
pub struct FallbackSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackSource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

macro_rules! read_through {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match $self.primary.$method($($arg),*).await {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    error = %err,
                    operation = stringify!($method),
                    "Primary store failed, serving fallback data"
                );
                $self.fallback.$method($($arg),*).await
            }
        }
    };
}

#[async_trait]
impl<P: ProductSource, F: ProductSource> ProductSource for FallbackSource<P, F> {
    async fn list_products(&self, query: &ProductQuery) -> StoreResult<Paginated<Product>> {
        read_through!(self.list_products(query))
    }

    async fn product_by_id(&self, id: i32) -> StoreResult<Option<Product>> {
        read_through!(self.product_by_id(id))
    }

    async fn product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        read_through!(self.product_by_slug(slug))
    }

    async fn product_stats(&self) -> StoreResult<ProductStats> {
        read_through!(self.product_stats())
    }

    async fn create_product(&self, input: NewProduct) -> StoreResult<Product> {
        self.primary.create_product(input).await
    }

    async fn update_product(&self, id: i32, patch: ProductPatch) -> StoreResult<Product> {
        self.primary.update_product(id, patch).await
    }
}

#[async_trait]
impl<P: CategorySource, F: CategorySource> CategorySource for FallbackSource<P, F> {
    async fn list_categories(&self, query: &CategoryQuery) -> StoreResult<Paginated<Category>> {
        read_through!(self.list_categories(query))
    }

    async fn category_by_id(&self, id: i32) -> StoreResult<Option<Category>> {
        read_through!(self.category_by_id(id))
    }

    async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        read_through!(self.category_by_slug(slug))
    }

    async fn category_stats(&self) -> StoreResult<CategoryStats> {
        read_through!(self.category_stats())
    }

    async fn create_category(&self, input: NewCategory) -> StoreResult<Category> {
        self.primary.create_category(input).await
    }

    async fn update_category(&self, id: i32, patch: CategoryPatch) -> StoreResult<Category> {
        self.primary.update_category(id, patch).await
    }
}

#[async_trait]
impl<P: OrderSource, F: OrderSource> OrderSource for FallbackSource<P, F> {
    async fn list_orders(&self, query: &OrderQuery) -> StoreResult<Paginated<Order>> {
        read_through!(self.list_orders(query))
    }

    async fn order_by_id(&self, id: i32) -> StoreResult<Option<Order>> {
        read_through!(self.order_by_id(id))
    }

    async fn order_by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        read_through!(self.order_by_number(order_number))
    }

    async fn order_stats(&self) -> StoreResult<OrderStats> {
        read_through!(self.order_stats())
    }

    async fn update_order(&self, id: i32, update: OrderUpdate) -> StoreResult<Order> {
        self.primary.update_order(id, update).await
    }
}

#[async_trait]
impl<P: CustomerSource, F: CustomerSource> CustomerSource for FallbackSource<P, F> {
    async fn list_customers(&self, query: &CustomerQuery) -> StoreResult<Paginated<Customer>> {
        read_through!(self.list_customers(query))
    }

    async fn customer_by_id(&self, id: i32) -> StoreResult<Option<Customer>> {
        read_through!(self.customer_by_id(id))
    }

    async fn customer_stats(&self) -> StoreResult<CustomerStats> {
        read_through!(self.customer_stats())
    }

    async fn update_customer(&self, id: i32, patch: CustomerPatch) -> StoreResult<Customer> {
        self.primary.update_customer(id, patch).await
    }
}

#[async_trait]
impl<P: ReviewSource, F: ReviewSource> ReviewSource for FallbackSource<P, F> {
    async fn list_reviews(&self, query: &ReviewQuery) -> StoreResult<Paginated<Review>> {
        read_through!(self.list_reviews(query))
    }

    async fn review_by_id(&self, id: i32) -> StoreResult<Option<Review>> {
        read_through!(self.review_by_id(id))
    }

    async fn review_stats(&self) -> StoreResult<ReviewStats> {
        read_through!(self.review_stats())
    }

    async fn set_review_approval(&self, id: i32, approved: bool) -> StoreResult<Review> {
        self.primary.set_review_approval(id, approved).await
    }
}

#[async_trait]
impl<P: ShippingSource, F: ShippingSource> ShippingSource for FallbackSource<P, F> {
    async fn shipping_zones(&self) -> StoreResult<Vec<ShippingZone>> {
        read_through!(self.shipping_zones())
    }

    async fn shipping_zone_by_id(&self, id: i32) -> StoreResult<Option<ShippingZone>> {
        read_through!(self.shipping_zone_by_id(id))
    }

    async fn create_shipping_zone(&self, input: NewShippingZone) -> StoreResult<ShippingZone> {
        self.primary.create_shipping_zone(input).await
    }

    async fn update_shipping_zone(
        &self,
        id: i32,
        patch: ShippingZonePatch,
    ) -> StoreResult<ShippingZone> {
        self.primary.update_shipping_zone(id, patch).await
    }

    async fn create_shipping_method(
        &self,
        zone_id: i32,
        input: NewShippingMethod,
    ) -> StoreResult<ShippingMethod> {
        self.primary.create_shipping_method(zone_id, input).await
    }

    async fn update_shipping_method(
        &self,
        id: i32,
        patch: ShippingMethodPatch,
    ) -> StoreResult<ShippingMethod> {
        self.primary.update_shipping_method(id, patch).await
    }
}

#[async_trait]
impl<P: SettingsSource, F: SettingsSource> SettingsSource for FallbackSource<P, F> {
    async fn settings(&self, category: Option<&str>) -> StoreResult<Vec<Setting>> {
        read_through!(self.settings(category))
    }

    async fn setting(&self, key: &str) -> StoreResult<Option<Setting>> {
        read_through!(self.setting(key))
    }

    async fn update_setting(&self, key: &str, value: Value) -> StoreResult<Setting> {
        self.primary.update_setting(key, value).await
    }
}

#[async_trait]
impl<P: ReportSource, F: ReportSource> ReportSource for FallbackSource<P, F> {
    async fn sales_report(&self, range: DateRange) -> StoreResult<SalesReport> {
        read_through!(self.sales_report(range))
    }
}
