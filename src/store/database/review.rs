use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

use super::DatabaseStore;
use crate::entities::{product, review, user};
use crate::error::{StoreError, StoreResult};
use crate::models::{Review, ReviewStats};
use crate::query::Paginated;
use crate::store::{ReviewQuery, ReviewSource};

impl DatabaseStore {
    async fn review_views(&self, rows: Vec<review::Model>) -> StoreResult<Vec<Review>> {
        let (users, products) = tokio::try_join!(
            self.load_by_ids::<user::Entity>(
                user::Column::Id,
                rows.iter().map(|row| row.user_id).collect(),
            ),
            self.load_by_ids::<product::Entity>(
                product::Column::Id,
                rows.iter().map(|row| row.product_id).collect(),
            ),
        )?;
        Ok(rows
            .into_iter()
            .map(|row| Review::assemble(row, &users, &products))
            .collect())
    }
}

#[async_trait]
impl ReviewSource for DatabaseStore {
    async fn list_reviews(&self, query: &ReviewQuery) -> StoreResult<Paginated<Review>> {
        let Paginated {
            items,
            total,
            page,
            total_pages,
        } = self.fetch_page::<review::Entity, _, _>(query).await?;
        Ok(Paginated {
            items: self.review_views(items).await?,
            total,
            page,
            total_pages,
        })
    }

    async fn review_by_id(&self, id: i32) -> StoreResult<Option<Review>> {
        let row = review::Entity::find_by_id(id).one(self.connection()).await?;
        Ok(self.review_views(row.into_iter().collect()).await?.pop())
    }

    async fn review_stats(&self) -> StoreResult<ReviewStats> {
        let db = self.connection();
        let (total_reviews, approved_reviews, verified_purchases, ratings) = tokio::try_join!(
            review::Entity::find().count(db),
            review::Entity::find()
                .filter(review::Column::IsApproved.eq(true))
                .count(db),
            review::Entity::find()
                .filter(review::Column::VerifiedPurchase.eq(true))
                .count(db),
            review::Entity::find()
                .select_only()
                .column(review::Column::Rating)
                .into_tuple::<i32>()
                .all(db),
        )?;
        let stats = ReviewStats {
            total_reviews,
            approved_reviews,
            pending_reviews: total_reviews.saturating_sub(approved_reviews),
            verified_purchases,
            average_rating: 0.0,
        };
        Ok(stats.with_average(ratings))
    }

    async fn set_review_approval(&self, id: i32, approved: bool) -> StoreResult<Review> {
        let mut row = review::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .ok_or_else(|| StoreError::not_found("review", id))?;
        row.is_approved = approved;
        row.updated_at = Utc::now();
        let active: review::ActiveModel = row.into();
        let updated = self.save(active).await?;
        self.review_views(vec![updated])
            .await?
            .pop()
            .ok_or_else(|| StoreError::not_found("review", id))
    }
}
