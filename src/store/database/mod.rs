mod category;
mod customer;
mod order;
mod product;
mod report;
mod review;
mod setting;
mod shipping;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::StoreResult;
use crate::query::{paginate, Keyed, Paginated, QueryDescriptor, RowFilter, RowSort};

#[derive(Clone, Debug)]
pub struct DatabaseStore {
    db: Arc<DatabaseConnection>,
}

impl DatabaseStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Filters that only make sense per row (low stock) disable the pushed
    /// down limit/offset: the whole filtered set is fetched, filtered in
    /// process, then paginated.
    async fn fetch_page<E, F, K>(
        &self,
        query: &QueryDescriptor<F, K>,
    ) -> StoreResult<Paginated<E::Model>>
    where
        E: EntityTrait,
        E::Model: Keyed + Send + Sync,
        F: RowFilter<E::Model>,
        K: RowSort<E::Model, Entity = E>,
    {
        let db = self.connection();
        let select = E::find()
            .filter(query.filters.condition())
            .order_by(query.sort.field.column(), query.sort.direction.into())
            .order_by_asc(K::id_column());

        if query.filters.needs_row_pass() {
            let rows: Vec<E::Model> = select
                .all(db)
                .await?
                .into_iter()
                .filter(|row| query.filters.row_predicate(row))
                .collect();
            return Ok(paginate(rows, query.page, query.limit));
        }

        let counter = E::find().filter(query.filters.condition());
        let (total, items) = match query.offset() {
            Some(offset) if query.limit > 0 => tokio::try_join!(
                counter.count(db),
                select.offset(offset).limit(query.limit).all(db)
            )?,
            _ => (counter.count(db).await?, Vec::new()),
        };

        Ok(Paginated::new(items, total, query.page, query.limit))
    }

    /// Loads rows by primary key, keyed by id. Missing ids are simply absent.
    async fn load_by_ids<E>(
        &self,
        id_column: E::Column,
        ids: BTreeSet<i32>,
    ) -> StoreResult<HashMap<i32, E::Model>>
    where
        E: EntityTrait,
        E::Model: Keyed + Send + Sync,
    {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = E::find()
            .filter(id_column.is_in(ids))
            .all(self.connection())
            .await?;
        Ok(rows.into_iter().map(|row| (row.key(), row)).collect())
    }

    async fn exists<E>(&self, condition: Condition) -> StoreResult<bool>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
    {
        Ok(E::find().filter(condition).count(self.connection()).await? > 0)
    }

    async fn insert_new<A>(
        &self,
        active: A,
        id: <A::Entity as EntityTrait>::Column,
    ) -> StoreResult<<A::Entity as EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let mut active = active.reset_all();
        active.not_set(id);
        Ok(active.insert(self.connection()).await?)
    }

    async fn save<A>(&self, active: A) -> StoreResult<<A::Entity as EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        Ok(active.reset_all().update(self.connection()).await?)
    }
}

fn id_set(ids: impl IntoIterator<Item = Option<i32>>) -> BTreeSet<i32> {
    ids.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests;
