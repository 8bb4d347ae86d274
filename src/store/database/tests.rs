use sea_orm::Database;
use std::sync::Arc;

use super::DatabaseStore;
use crate::entities::order::Status;
use crate::entities::{seed_dataset, setup_schema};
use crate::error::StoreError;
use crate::models::{
    CategoryPatch, CategoryStats, DateRange, NewProduct, OrderUpdate, ProductPatch,
};
use crate::query::{
    CategoryFilters, OrderFilters, OrderSort, ProductFilters, ProductSort, QueryOptions,
    ReviewFilters, Sort,
};
use crate::store::testing::{priced_products, three_level_categories};
use crate::store::{
    CategorySource, CustomerSource, Dataset, MemoryStore, OrderSource, ProductSource,
    ReportSource, ReviewSource, SettingsSource, ShippingSource,
};

async fn store_with(data: Dataset) -> DatabaseStore {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    setup_schema(&db).await.expect("schema");
    assert!(seed_dataset(&db, &data).await.expect("seed"));
    DatabaseStore::new(Arc::new(db))
}

#[tokio::test]
async fn seeding_twice_is_a_no_op() {
    let store = store_with(Dataset::sample()).await;
    assert!(!seed_dataset(store.connection(), &Dataset::sample())
        .await
        .expect("second seed"));
}

#[tokio::test]
async fn active_products_by_price_page_one() {
    let store = store_with(priced_products(&[100, 50, 200])).await;
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

    let beyond = QueryOptions::<ProductFilters, ProductSort>::default()
        .page(5, 2)
        .normalize();
    let empty = store.list_products(&beyond).await.expect("list");
    assert!(empty.items.is_empty());
    assert_eq!(empty.total, 3);
}

#[tokio::test]
async fn listings_match_the_memory_store() {
    let data = Dataset::sample();
    let db = store_with(data.clone()).await;
    let memory = MemoryStore::new(data);

    let queries = [
        QueryOptions::with_filters(ProductFilters::default()).page(1, 3),
        QueryOptions::with_filters(ProductFilters {
            search: Some("GRANOLA".into()),
            ..Default::default()
        }),
        QueryOptions::with_filters(ProductFilters {
            low_stock: Some(true),
            ..Default::default()
        })
        .page(2, 2)
        .sorted(Sort::desc(ProductSort::Name)),
        QueryOptions::with_filters(ProductFilters {
            category_id: Some(1),
            min_price: Some(5_000),
            ..Default::default()
        }),
    ];
    for options in queries {
        let query = options.normalize();
        assert_eq!(
            db.list_products(&query).await.expect("db list"),
            memory.list_products(&query).await.expect("memory list"),
            "{:?}",
            query.filters
        );
    }

    let orders = QueryOptions::with_filters(OrderFilters {
        user_id: Some(2),
        ..Default::default()
    })
    .sorted(Sort::asc(OrderSort::TotalAmount))
    .normalize();
    assert_eq!(
        db.list_orders(&orders).await.expect("db orders"),
        memory.list_orders(&orders).await.expect("memory orders")
    );

    let reviews = QueryOptions::with_filters(ReviewFilters {
        min_rating: Some(4),
        ..Default::default()
    })
    .normalize();
    assert_eq!(
        db.list_reviews(&reviews).await.expect("db reviews"),
        memory.list_reviews(&reviews).await.expect("memory reviews")
    );

    let categories = QueryOptions::with_filters(CategoryFilters::default()).normalize();
    assert_eq!(
        db.list_categories(&categories).await.expect("db categories"),
        memory
            .list_categories(&categories)
            .await
            .expect("memory categories")
    );
}

#[tokio::test]
async fn stats_match_the_memory_store() {
    let data = Dataset::sample();
    let db = store_with(data.clone()).await;
    let memory = MemoryStore::new(data);

    assert_eq!(
        db.product_stats().await.expect("db"),
        memory.product_stats().await.expect("memory")
    );
    assert_eq!(
        db.order_stats().await.expect("db"),
        memory.order_stats().await.expect("memory")
    );
    assert_eq!(
        db.customer_stats().await.expect("db"),
        memory.customer_stats().await.expect("memory")
    );
    assert_eq!(
        db.review_stats().await.expect("db"),
        memory.review_stats().await.expect("memory")
    );
    assert_eq!(
        db.category_stats().await.expect("db"),
        CategoryStats {
            total_categories: 5,
            active_categories: 4,
            main_categories: 2,
            subcategories: 3,
        }
    );
    assert_eq!(
        db.sales_report(DateRange::default()).await.expect("db"),
        memory.sales_report(DateRange::default()).await.expect("memory")
    );
}

#[tokio::test]
async fn joins_are_single_level_and_tolerant() {
    let store = store_with(Dataset::sample()).await;

    let order = store
        .order_by_number("ORD-2024-0001")
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(order.order_items.len(), 2);
    assert_eq!(order.customer.map(|c| c.email), Some("andres.restrepo@example.co".into()));

    let review = store.review_by_id(1).await.expect("get").expect("exists");
    assert_eq!(review.product.map(|p| p.id), Some(1));
    assert_eq!(review.user.map(|u| u.id), Some(2));

    let uncategorized = store.product_by_id(7).await.expect("get").expect("exists");
    assert_eq!(uncategorized.category, None);

    assert_eq!(store.product_by_slug("no-existe").await.expect("get"), None);
}

#[tokio::test]
async fn stored_order_total_survives_updates() {
    let store = store_with(Dataset::sample()).await;
    let mut update = OrderUpdate::status(Status::Delivered);
    update.admin_notes = Some("Entregado en portería".into());

    let order = store.update_order(3, update).await.expect("update");
    assert_eq!(order.total_amount, 30_000);
    assert_eq!(order.subtotal, 27_900);
    assert!(order.delivered_at.is_some());

    let reread = store.order_by_id(3).await.expect("get").expect("exists");
    assert_eq!(reread.total_amount, 30_000);
    assert_eq!(reread.admin_notes.as_deref(), Some("Entregado en portería"));
}

#[tokio::test]
async fn product_mutations_round_trip() {
    let store = store_with(Dataset::sample()).await;
    let input: NewProduct = serde_json::from_value(serde_json::json!({
        "name": "Panela pulverizada",
        "slug": "panela-pulverizada",
        "sku": "END-008",
        "price": 7900,
        "stock_quantity": 2,
        "category_id": 1
    }))
    .expect("valid payload");

    let created = store.create_product(input.clone()).await.expect("create");
    assert_eq!(created.id, 8);
    assert_eq!(created.low_stock_threshold, 5);
    assert_eq!(created.category.as_ref().map(|c| c.id), Some(1));

    assert!(matches!(
        store.create_product(input).await,
        Err(StoreError::Conflict(_))
    ));

    let restocked = store
        .update_product(created.id, ProductPatch::stock(40))
        .await
        .expect("update");
    assert_eq!(restocked.stock_quantity, 40);
    assert!(!restocked.is_low_stock());

    let detach = ProductPatch {
        category_id: Some(None),
        ..Default::default()
    };
    let detached = store.update_product(created.id, detach).await.expect("update");
    assert_eq!(detached.category, None);
}

#[tokio::test]
async fn category_cycles_are_rejected() {
    let store = store_with(three_level_categories()).await;
    let patch = CategoryPatch {
        parent_id: Some(Some(3)),
        ..Default::default()
    };
    assert!(matches!(
        store.update_category(1, patch).await,
        Err(StoreError::CategoryCycle {
            category_id: 1,
            parent_id: 3
        })
    ));
    assert_eq!(
        store.category_by_id(1).await.expect("get").map(|c| c.parent_id),
        Some(None)
    );
}

#[tokio::test]
async fn settings_and_shipping() {
    let store = store_with(Dataset::sample()).await;
    let updated = store
        .update_setting("free_shipping_threshold", serde_json::json!(120000))
        .await
        .expect("update");
    assert_eq!(updated.raw_value, "120000");
    assert!(store
        .update_setting("tax_rate", serde_json::json!("diecinueve"))
        .await
        .is_err());
    assert!(matches!(
        store.update_setting("missing", serde_json::json!(1)).await,
        Err(StoreError::NotFound { .. })
    ));

    let zones = store.shipping_zones().await.expect("zones");
    let names: Vec<&str> = zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["Área metropolitana", "Nacional"]);
    assert_eq!(zones[1].methods.len(), 2);
}

#[tokio::test]
async fn customer_totals_come_from_paid_orders() {
    let store = store_with(Dataset::sample()).await;
    let customer = store.customer_by_id(3).await.expect("get").expect("exists");
    // One paid order and one refunded.
    assert_eq!(customer.totals.total_orders, 2);
    assert_eq!(customer.totals.total_spent, 47_625);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let mut data = Dataset::sample();
    data.products[0].name = "Granola 100% avena_integral".into();
    let db = store_with(data.clone()).await;
    let memory = MemoryStore::new(data);

    for (needle, expected) in [("_", 1), ("%", 1), ("100%", 1), ("a_i", 1), ("0%a", 0)] {
        let query = QueryOptions::with_filters(ProductFilters {
            search: Some(needle.into()),
            ..Default::default()
        })
        .normalize();
        let from_db = db.list_products(&query).await.expect("db list");
        assert_eq!(from_db.total, expected, "needle {needle:?}");
        assert_eq!(
            from_db,
            memory.list_products(&query).await.expect("memory list"),
            "needle {needle:?}"
        );
    }
}
