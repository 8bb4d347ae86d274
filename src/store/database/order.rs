use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use std::collections::BTreeSet;
use tracing::info;

use super::DatabaseStore;
use crate::entities::order::{self, PaymentStatus, Status};
use crate::entities::{order_item, user};
use crate::error::{StoreError, StoreResult};
use crate::models::order::group_items;
use crate::models::{Order, OrderStats, OrderUpdate};
use crate::query::Paginated;
use crate::store::{OrderQuery, OrderSource};

impl DatabaseStore {
    pub(super) async fn order_items_of(
        &self,
        order_ids: BTreeSet<i32>,
    ) -> StoreResult<Vec<order_item::Model>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_item::Column::Id)
            .all(self.connection())
            .await?)
    }

    async fn order_views(&self, rows: Vec<order::Model>) -> StoreResult<Vec<Order>> {
        let (customers, items) = tokio::try_join!(
            self.load_by_ids::<user::Entity>(
                user::Column::Id,
                rows.iter().map(|row| row.user_id).collect(),
            ),
            self.order_items_of(rows.iter().map(|row| row.id).collect()),
        )?;
        let mut items = group_items(items);
        Ok(rows
            .into_iter()
            .map(|row| Order::assemble(row, &customers, &mut items))
            .collect())
    }

    async fn order_view(&self, row: Option<order::Model>) -> StoreResult<Option<Order>> {
        Ok(self.order_views(row.into_iter().collect()).await?.pop())
    }
}

#[async_trait]
impl OrderSource for DatabaseStore {
    async fn list_orders(&self, query: &OrderQuery) -> StoreResult<Paginated<Order>> {
        let Paginated {
            items,
            total,
            page,
            total_pages,
        } = self.fetch_page::<order::Entity, _, _>(query).await?;
        Ok(Paginated {
            items: self.order_views(items).await?,
            total,
            page,
            total_pages,
        })
    }

    async fn order_by_id(&self, id: i32) -> StoreResult<Option<Order>> {
        let row = order::Entity::find_by_id(id).one(self.connection()).await?;
        self.order_view(row).await
    }

    async fn order_by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        let row = order::Entity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .one(self.connection())
            .await?;
        self.order_view(row).await
    }

    async fn order_stats(&self) -> StoreResult<OrderStats> {
        let db = self.connection();
        let with_status = |status: Status| {
            order::Entity::find()
                .filter(order::Column::Status.eq(status))
                .count(db)
        };
        let (total, pending, confirmed, processing, shipped, delivered, cancelled, paid_totals) = tokio::try_join!(
            order::Entity::find().count(db),
            with_status(Status::Pending),
            with_status(Status::Confirmed),
            with_status(Status::Processing),
            with_status(Status::Shipped),
            with_status(Status::Delivered),
            with_status(Status::Cancelled),
            order::Entity::find()
                .select_only()
                .column(order::Column::TotalAmount)
                .filter(order::Column::PaymentStatus.eq(PaymentStatus::Paid))
                .into_tuple::<i64>()
                .all(db),
        )?;

        let mut stats = OrderStats {
            total_orders: total,
            ..Default::default()
        };
        for (status, count) in [
            (Status::Pending, pending),
            (Status::Confirmed, confirmed),
            (Status::Processing, processing),
            (Status::Shipped, shipped),
            (Status::Delivered, delivered),
            (Status::Cancelled, cancelled),
        ] {
            stats.count_status(status, count);
        }
        Ok(stats.with_revenue(paid_totals))
    }

    async fn update_order(&self, id: i32, update: OrderUpdate) -> StoreResult<Order> {
        let mut row = order::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .ok_or_else(|| StoreError::not_found("order", id))?;
        let from = row.status;
        update.apply(&mut row, Utc::now());
        let active: order::ActiveModel = row.into();
        let updated = self.save(active).await?;
        if updated.status != from {
            info!(
                order = %updated.order_number,
                from = %from,
                to = %updated.status,
                "Order status changed"
            );
        }
        self.order_view(Some(updated))
            .await?
            .ok_or_else(|| StoreError::not_found("order", id))
    }
}
