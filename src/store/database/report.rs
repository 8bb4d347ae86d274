use async_trait::async_trait;
use sea_orm::{EntityTrait, QueryFilter};

use super::DatabaseStore;
use crate::entities::order;
use crate::error::StoreResult;
use crate::models::{DateRange, SalesReport};
use crate::query::RowFilter;
use crate::store::ReportSource;

#[async_trait]
impl ReportSource for DatabaseStore {
    async fn sales_report(&self, range: DateRange) -> StoreResult<SalesReport> {
        let orders = order::Entity::find()
            .filter(range.order_filters().condition())
            .all(self.connection())
            .await?;
        let items = self
            .order_items_of(orders.iter().map(|order| order.id).collect())
            .await?;
        Ok(SalesReport::build(range, &orders, &items))
    }
}
