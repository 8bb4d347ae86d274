//! Data access behind one interface.

pub mod database;
pub mod fallback;
pub mod fixtures;
pub mod memory;

use async_trait::async_trait;
use sea_orm::Database;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::CategoryTree;
use crate::config::{AppConfig, DataSourceKind};
use crate::entities::{seed_dataset, setup_schema};
use crate::error::{StoreError, StoreResult};
use crate::models::shipping::ShippingMethod;
use crate::models::{
    Category, CategoryPatch, CategoryStats, Customer, CustomerPatch, CustomerStats, DateRange,
    NewCategory, NewProduct, NewShippingMethod, NewShippingZone, Order, OrderStats, OrderUpdate,
    Product, ProductPatch, ProductStats, Review, ReviewStats, SalesReport, Setting,
    ShippingMethodPatch, ShippingZone, ShippingZonePatch,
};
use crate::query::{
    CategoryFilters, CategorySort, CustomerFilters, CustomerSort, OrderFilters, OrderSort,
    Paginated, ProductFilters, ProductSort, QueryDescriptor, QueryOptions, ReviewFilters,
    ReviewSort, Sort,
};

pub use database::DatabaseStore;
pub use fallback::FallbackSource;
pub use fixtures::Dataset;
pub use memory::MemoryStore;

pub type ProductQuery = QueryDescriptor<ProductFilters, ProductSort>;
pub type CategoryQuery = QueryDescriptor<CategoryFilters, CategorySort>;
pub type OrderQuery = QueryDescriptor<OrderFilters, OrderSort>;
pub type CustomerQuery = QueryDescriptor<CustomerFilters, CustomerSort>;
pub type ReviewQuery = QueryDescriptor<ReviewFilters, ReviewSort>;

/// Upper bound used by lookups that want "every match" in one page.
const ALL_ROWS: u64 = u32::MAX as u64;

#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn list_products(&self, query: &ProductQuery) -> StoreResult<Paginated<Product>>;
    async fn product_by_id(&self, id: i32) -> StoreResult<Option<Product>>;
    async fn product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>>;
    async fn product_stats(&self) -> StoreResult<ProductStats>;
    async fn create_product(&self, input: NewProduct) -> StoreResult<Product>;
    async fn update_product(&self, id: i32, patch: ProductPatch) -> StoreResult<Product>;

    async fn products_by_category(&self, category_id: i32, limit: u64) -> StoreResult<Vec<Product>> {
        let query = QueryOptions::with_filters(ProductFilters {
            category_id: Some(category_id),
            is_active: Some(true),
            ..Default::default()
        })
        .page(1, limit)
        .sorted(Sort::asc(ProductSort::Name))
        .normalize();
        Ok(self.list_products(&query).await?.items)
    }

    async fn featured_products(&self, limit: u64) -> StoreResult<Vec<Product>> {
        let query = QueryOptions::with_filters(ProductFilters {
            is_active: Some(true),
            is_featured: Some(true),
            ..Default::default()
        })
        .page(1, limit)
        .normalize();
        Ok(self.list_products(&query).await?.items)
    }

    /// Products at or under their threshold, emptiest first.
    async fn low_stock_products(&self, limit: u64) -> StoreResult<Vec<Product>> {
        let query = QueryOptions::with_filters(ProductFilters {
            low_stock: Some(true),
            ..Default::default()
        })
        .page(1, limit)
        .sorted(Sort::asc(ProductSort::StockQuantity))
        .normalize();
        Ok(self.list_products(&query).await?.items)
    }
}

#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn list_categories(&self, query: &CategoryQuery) -> StoreResult<Paginated<Category>>;
    async fn category_by_id(&self, id: i32) -> StoreResult<Option<Category>>;
    async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;
    async fn category_stats(&self) -> StoreResult<CategoryStats>;
    async fn create_category(&self, input: NewCategory) -> StoreResult<Category>;
    async fn update_category(&self, id: i32, patch: CategoryPatch) -> StoreResult<Category>;

    /// Every category in tree order: `sort_order`, then id.
    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        let query = QueryOptions::<CategoryFilters, CategorySort>::default()
            .page(1, ALL_ROWS)
            .normalize();
        Ok(self.list_categories(&query).await?.items)
    }
}

#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn list_orders(&self, query: &OrderQuery) -> StoreResult<Paginated<Order>>;
    async fn order_by_id(&self, id: i32) -> StoreResult<Option<Order>>;
    async fn order_by_number(&self, order_number: &str) -> StoreResult<Option<Order>>;
    async fn order_stats(&self) -> StoreResult<OrderStats>;
    /// Applies an already approved update. Amounts are never touched.
    async fn update_order(&self, id: i32, update: OrderUpdate) -> StoreResult<Order>;

    async fn recent_orders(&self, limit: u64) -> StoreResult<Vec<Order>> {
        let query = QueryOptions::<OrderFilters, OrderSort>::default()
            .page(1, limit)
            .sorted(Sort::desc(OrderSort::CreatedAt))
            .normalize();
        Ok(self.list_orders(&query).await?.items)
    }

    async fn customer_orders(
        &self,
        user_id: i32,
        options: QueryOptions<OrderFilters, OrderSort>,
    ) -> StoreResult<Paginated<Order>> {
        let mut query = options.normalize();
        query.filters.user_id = Some(user_id);
        self.list_orders(&query).await
    }
}

#[async_trait]
pub trait CustomerSource: Send + Sync {
    async fn list_customers(&self, query: &CustomerQuery) -> StoreResult<Paginated<Customer>>;
    async fn customer_by_id(&self, id: i32) -> StoreResult<Option<Customer>>;
    async fn customer_stats(&self) -> StoreResult<CustomerStats>;
    async fn update_customer(&self, id: i32, patch: CustomerPatch) -> StoreResult<Customer>;
}

#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn list_reviews(&self, query: &ReviewQuery) -> StoreResult<Paginated<Review>>;
    async fn review_by_id(&self, id: i32) -> StoreResult<Option<Review>>;
    async fn review_stats(&self) -> StoreResult<ReviewStats>;
    async fn set_review_approval(&self, id: i32, approved: bool) -> StoreResult<Review>;
}

#[async_trait]
pub trait ShippingSource: Send + Sync {
    async fn shipping_zones(&self) -> StoreResult<Vec<ShippingZone>>;
    async fn shipping_zone_by_id(&self, id: i32) -> StoreResult<Option<ShippingZone>>;
    async fn create_shipping_zone(&self, input: NewShippingZone) -> StoreResult<ShippingZone>;
    async fn update_shipping_zone(&self, id: i32, patch: ShippingZonePatch) -> StoreResult<ShippingZone>;
    async fn create_shipping_method(
        &self,
        zone_id: i32,
        input: NewShippingMethod,
    ) -> StoreResult<ShippingMethod>;
    async fn update_shipping_method(
        &self,
        id: i32,
        patch: ShippingMethodPatch,
    ) -> StoreResult<ShippingMethod>;
}

#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// All settings, or those of one category, ordered by key.
    async fn settings(&self, category: Option<&str>) -> StoreResult<Vec<Setting>>;
    async fn setting(&self, key: &str) -> StoreResult<Option<Setting>>;
    /// Stores `value` after checking it against the setting's type tag.
    async fn update_setting(&self, key: &str, value: Value) -> StoreResult<Setting>;
}

#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn sales_report(&self, range: DateRange) -> StoreResult<SalesReport>;
}

pub trait DataSource:
    ProductSource
    + CategorySource
    + OrderSource
    + CustomerSource
    + ReviewSource
    + ShippingSource
    + SettingsSource
    + ReportSource
{
}

impl<T> DataSource for T where
    T: ProductSource
        + CategorySource
        + OrderSource
        + CustomerSource
        + ReviewSource
        + ShippingSource
        + SettingsSource
        + ReportSource
{
}

/// `database` connects, creates missing tables and optionally seeds them,
/// then serves through a [`FallbackSource`] backed by the sample dataset.
/// If the database cannot be reached the sample dataset is served alone.
pub async fn connect(config: &AppConfig) -> StoreResult<Arc<dyn DataSource>> {
    let url = match (config.data_source, config.database_url.as_deref()) {
        (DataSourceKind::Memory, _) => {
            info!("Serving the sample dataset from memory");
            return Ok(Arc::new(MemoryStore::sample()));
        }
        (DataSourceKind::Database, Some(url)) => url,
        (DataSourceKind::Database, None) => {
            return Err(StoreError::Validation("DATABASE_URL must be set".into()))
        }
    };

    let db = match Database::connect(url).await {
        Ok(db) => db,
        Err(err) => {
            warn!(error = %err, "Failed to connect to database, serving sample dataset");
            return Ok(Arc::new(MemoryStore::sample()));
        }
    };

    setup_schema(&db).await?;
    if config.seed_database {
        seed_dataset(&db, &Dataset::sample()).await?;
    }
    info!("Connected to database");

    Ok(Arc::new(FallbackSource::new(
        DatabaseStore::new(Arc::new(db)),
        MemoryStore::sample(),
    )))
}

pub(crate) fn conflict(entity: &str, field: &str, value: &str) -> StoreError {
    StoreError::Conflict(format!("{entity} with {field} '{value}' already exists"))
}

/// Parent checks shared by both stores. `links` are `(id, parent_id)` of
/// every stored category.
pub(crate) fn check_category_parent(
    links: impl IntoIterator<Item = (i32, Option<i32>)>,
    category_id: Option<i32>,
    parent_id: Option<i32>,
) -> StoreResult<()> {
    match parent_id {
        None => Ok(()),
        Some(parent_id) => CategoryTree::new(links).check_parent(category_id, parent_id),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Small datasets for the scenarios the store tests pin down.

    use super::Dataset;
    use crate::entities::category;

    pub fn priced_products(prices: &[i64]) -> Dataset {
        let mut data = Dataset::sample();
        let template = data.products[0].clone();
        data.products = prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                let id = i as i32 + 1;
                let mut row = template.clone();
                row.id = id;
                row.name = format!("Producto {id}");
                row.slug = format!("producto-{id}");
                row.sku = format!("SKU-{id:03}");
                row.price = *price;
                row.is_active = true;
                row
            })
            .collect();
        data.order_items.clear();
        data.reviews.clear();
        data
    }

    /// Categories 1 > 2 > 3, nothing else.
    pub fn three_level_categories() -> Dataset {
        let mut data = Dataset::sample();
        let template: category::Model = data.categories[0].clone();
        data.categories = (1..=3)
            .map(|id| {
                let mut row = template.clone();
                row.id = id;
                row.name = format!("Nivel {id}");
                row.slug = format!("nivel-{id}");
                row.parent_id = (id > 1).then_some(id - 1);
                row
            })
            .collect();
        data.products.iter_mut().for_each(|p| p.category_id = None);
        data
    }
}
