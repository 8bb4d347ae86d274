pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod review;
pub mod shipping_method;
pub mod shipping_zone;
pub mod system_setting;
pub mod types;
pub mod user;

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, Schema, TransactionTrait,
};
use tracing::info;

use crate::entities::{
    category::Entity as Category, order::Entity as Order, order_item::Entity as OrderItem,
    product::Entity as Product, review::Entity as Review,
    shipping_method::Entity as ShippingMethod, shipping_zone::Entity as ShippingZone,
    system_setting::Entity as SystemSetting, user::Entity as User,
};
use crate::store::Dataset;

/// Creates every table that is missing. Referenced tables come first.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Order),
        schema.create_table_from_entity(OrderItem),
        schema.create_table_from_entity(Review),
        schema.create_table_from_entity(ShippingZone),
        schema.create_table_from_entity(ShippingMethod),
        schema.create_table_from_entity(SystemSetting),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }

    Ok(())
}

const SEEDED_TABLES: [&str; 9] = [
    "categories",
    "products",
    "users",
    "orders",
    "order_items",
    "product_reviews",
    "shipping_zones",
    "shipping_methods",
    "system_settings",
];

/// Loads a dataset into an empty database. A database that already holds
/// products is left untouched.
pub async fn seed_dataset(db: &DatabaseConnection, data: &Dataset) -> Result<bool, DbErr> {
    if Product::find().count(db).await? > 0 {
        info!("Database already holds products, skipping seed");
        return Ok(false);
    }

    let txn = db.begin().await?;

    insert_all(&txn, data.categories.clone()).await?;
    insert_all(&txn, data.products.clone()).await?;
    insert_all(&txn, data.users.clone()).await?;
    insert_all(&txn, data.orders.clone()).await?;
    insert_all(&txn, data.order_items.clone()).await?;
    insert_all(&txn, data.reviews.clone()).await?;
    insert_all(&txn, data.shipping_zones.clone()).await?;
    insert_all(&txn, data.shipping_methods.clone()).await?;
    insert_all(&txn, data.settings.clone()).await?;

    txn.commit().await?;

    if db.get_database_backend() == DbBackend::Postgres {
        // Explicit ids do not advance postgres sequences.
        for table in SEEDED_TABLES {
            db.execute_unprepared(&format!(
                "SELECT setval(pg_get_serial_sequence('{table}', 'id'), COALESCE(MAX(id), 1)) FROM {table}"
            ))
            .await?;
        }
    }

    info!(
        products = data.products.len(),
        orders = data.orders.len(),
        "Seeded database from dataset"
    );
    Ok(true)
}

async fn insert_all<C, M, A>(db: &C, rows: Vec<M>) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    M: IntoActiveModel<A>,
    A: ActiveModelTrait + Send,
{
    if rows.is_empty() {
        return Ok(());
    }
    // Rows keep their ids, so every column has to be marked as set.
    let models: Vec<A> = rows
        .into_iter()
        .map(|row| row.into_active_model().reset_all())
        .collect();
    <A::Entity as EntityTrait>::insert_many(models)
        .exec(db)
        .await?;
    Ok(())
}
