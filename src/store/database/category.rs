use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

use super::DatabaseStore;
use crate::entities::{category, product};
use crate::error::{StoreError, StoreResult};
use crate::models::category::count_by_category;
use crate::models::{Category, CategoryPatch, CategoryStats, NewCategory};
use crate::query::Paginated;
use crate::store::{check_category_parent, conflict, CategoryQuery, CategorySource};

impl DatabaseStore {
    async fn category_views(&self, rows: Vec<category::Model>) -> StoreResult<Vec<Category>> {
        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let counts = if ids.is_empty() {
            Default::default()
        } else {
            let linked = product::Entity::find()
                .select_only()
                .column(product::Column::CategoryId)
                .filter(product::Column::CategoryId.is_in(ids))
                .into_tuple::<Option<i32>>()
                .all(self.connection())
                .await?;
            count_by_category(linked)
        };
        Ok(rows
            .into_iter()
            .map(|row| Category::assemble(row, &counts))
            .collect())
    }

    async fn category_view(&self, row: Option<category::Model>) -> StoreResult<Option<Category>> {
        Ok(self.category_views(row.into_iter().collect()).await?.pop())
    }

    async fn category_links(&self) -> StoreResult<Vec<(i32, Option<i32>)>> {
        Ok(category::Entity::find()
            .select_only()
            .column(category::Column::Id)
            .column(category::Column::ParentId)
            .into_tuple::<(i32, Option<i32>)>()
            .all(self.connection())
            .await?)
    }

    async fn check_category_slug(&self, id: i32, slug: &str) -> StoreResult<()> {
        let taken = self
            .exists::<category::Entity>(
                Condition::all()
                    .add(category::Column::Slug.eq(slug))
                    .add(category::Column::Id.ne(id)),
            )
            .await?;
        if taken {
            return Err(conflict("Category", "slug", slug));
        }
        Ok(())
    }
}

#[async_trait]
impl CategorySource for DatabaseStore {
    async fn list_categories(&self, query: &CategoryQuery) -> StoreResult<Paginated<Category>> {
        let Paginated {
            items,
            total,
            page,
            total_pages,
        } = self.fetch_page::<category::Entity, _, _>(query).await?;
        Ok(Paginated {
            items: self.category_views(items).await?,
            total,
            page,
            total_pages,
        })
    }

    async fn category_by_id(&self, id: i32) -> StoreResult<Option<Category>> {
        let row = category::Entity::find_by_id(id)
            .one(self.connection())
            .await?;
        self.category_view(row).await
    }

    async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let row = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.connection())
            .await?;
        self.category_view(row).await
    }

    async fn category_stats(&self) -> StoreResult<CategoryStats> {
        let db = self.connection();
        let (total_categories, active_categories, main_categories) = tokio::try_join!(
            category::Entity::find().count(db),
            category::Entity::find()
                .filter(category::Column::IsActive.eq(true))
                .count(db),
            category::Entity::find()
                .filter(category::Column::ParentId.is_null())
                .count(db),
        )?;
        Ok(CategoryStats {
            total_categories,
            active_categories,
            main_categories,
            subcategories: total_categories.saturating_sub(main_categories),
        })
    }

    async fn create_category(&self, input: NewCategory) -> StoreResult<Category> {
        self.check_category_slug(0, &input.slug).await?;
        check_category_parent(self.category_links().await?, None, input.parent_id)?;
        let active: category::ActiveModel = input.into_model(0, Utc::now()).into();
        let created = self.insert_new(active, category::Column::Id).await?;
        self.category_view(Some(created))
            .await?
            .ok_or_else(|| StoreError::not_found("category", "new"))
    }

    async fn update_category(&self, id: i32, patch: CategoryPatch) -> StoreResult<Category> {
        let mut row = category::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .ok_or_else(|| StoreError::not_found("category", id))?;
        let moves = patch.parent_id.is_some();
        patch.apply(&mut row, Utc::now());
        self.check_category_slug(id, &row.slug).await?;
        if moves {
            check_category_parent(self.category_links().await?, Some(id), row.parent_id)?;
        }
        let active: category::ActiveModel = row.into();
        let updated = self.save(active).await?;
        self.category_view(Some(updated))
            .await?
            .ok_or_else(|| StoreError::not_found("category", id))
    }
}
