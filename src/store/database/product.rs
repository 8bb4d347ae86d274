use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use tracing::info;

use super::{id_set, DatabaseStore};
use crate::entities::{category, product};
use crate::error::{StoreError, StoreResult};
use crate::models::{NewProduct, Product, ProductPatch, ProductStats};
use crate::query::Paginated;
use crate::store::{conflict, ProductQuery, ProductSource};

impl DatabaseStore {
    async fn product_views(&self, rows: Vec<product::Model>) -> StoreResult<Vec<Product>> {
        let categories = self
            .load_by_ids::<category::Entity>(
                category::Column::Id,
                id_set(rows.iter().map(|row| row.category_id)),
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| Product::assemble(row, &categories))
            .collect())
    }

    async fn product_view(&self, row: Option<product::Model>) -> StoreResult<Option<Product>> {
        Ok(self.product_views(row.into_iter().collect()).await?.pop())
    }

    async fn check_product(&self, row: &product::Model) -> StoreResult<()> {
        let others = || Condition::all().add(product::Column::Id.ne(row.id));
        if self
            .exists::<product::Entity>(others().add(product::Column::Slug.eq(row.slug.as_str())))
            .await?
        {
            return Err(conflict("Product", "slug", &row.slug));
        }
        if self
            .exists::<product::Entity>(others().add(product::Column::Sku.eq(row.sku.as_str())))
            .await?
        {
            return Err(conflict("Product", "sku", &row.sku));
        }
        if let Some(category_id) = row.category_id {
            if category::Entity::find_by_id(category_id)
                .one(self.connection())
                .await?
                .is_none()
            {
                return Err(StoreError::Validation(format!(
                    "category {} does not exist",
                    category_id
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductSource for DatabaseStore {
    async fn list_products(&self, query: &ProductQuery) -> StoreResult<Paginated<Product>> {
        let Paginated {
            items,
            total,
            page,
            total_pages,
        } = self.fetch_page::<product::Entity, _, _>(query).await?;
        Ok(Paginated {
            items: self.product_views(items).await?,
            total,
            page,
            total_pages,
        })
    }

    async fn product_by_id(&self, id: i32) -> StoreResult<Option<Product>> {
        let row = product::Entity::find_by_id(id).one(self.connection()).await?;
        self.product_view(row).await
    }

    async fn product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        let row = product::Entity::find()
            .filter(product::Column::Slug.eq(slug))
            .one(self.connection())
            .await?;
        self.product_view(row).await
    }

    async fn product_stats(&self) -> StoreResult<ProductStats> {
        let db = self.connection();
        let (total_products, active_products, featured_products, out_of_stock_products, levels) = tokio::try_join!(
            product::Entity::find().count(db),
            product::Entity::find()
                .filter(product::Column::IsActive.eq(true))
                .count(db),
            product::Entity::find()
                .filter(product::Column::IsFeatured.eq(true))
                .count(db),
            product::Entity::find()
                .filter(product::Column::StockQuantity.lte(0))
                .count(db),
            product::Entity::find()
                .select_only()
                .column(product::Column::StockQuantity)
                .column(product::Column::LowStockThreshold)
                .into_tuple::<(i32, i32)>()
                .all(db),
        )?;

        let low_stock_products = levels
            .into_iter()
            .filter(|(stock, threshold)| product::is_low_stock(*stock, *threshold))
            .count() as u64;

        Ok(ProductStats {
            total_products,
            active_products,
            featured_products,
            low_stock_products,
            out_of_stock_products,
        })
    }

    async fn create_product(&self, input: NewProduct) -> StoreResult<Product> {
        let row = input.into_model(0, Utc::now());
        self.check_product(&row).await?;
        let active: product::ActiveModel = row.into();
        let created = self.insert_new(active, product::Column::Id).await?;
        info!(id = created.id, sku = %created.sku, "Created product");
        self.product_view(Some(created))
            .await?
            .ok_or_else(|| StoreError::not_found("product", "new"))
    }

    async fn update_product(&self, id: i32, patch: ProductPatch) -> StoreResult<Product> {
        let mut row = product::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))?;
        patch.apply(&mut row, Utc::now());
        self.check_product(&row).await?;
        let active: product::ActiveModel = row.into();
        let updated = self.save(active).await?;
        self.product_view(Some(updated))
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))
    }
}
