use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use std::collections::HashMap;

use super::DatabaseStore;
use crate::entities::order::{self, PaymentStatus};
use crate::entities::user::{self, Role};
use crate::error::{StoreError, StoreResult};
use crate::models::{Customer, CustomerPatch, CustomerStats, CustomerTotals};
use crate::query::Paginated;
use crate::store::{conflict, CustomerQuery, CustomerSource};

impl DatabaseStore {
    async fn customer_totals(&self, user_ids: Vec<i32>) -> StoreResult<HashMap<i32, CustomerTotals>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = order::Entity::find()
            .select_only()
            .column(order::Column::UserId)
            .column(order::Column::PaymentStatus)
            .column(order::Column::TotalAmount)
            .filter(order::Column::UserId.is_in(user_ids))
            .into_tuple::<(i32, PaymentStatus, i64)>()
            .all(self.connection())
            .await?;
        Ok(CustomerTotals::by_customer(rows))
    }

    async fn customer_views(&self, rows: Vec<user::Model>) -> StoreResult<Vec<Customer>> {
        let totals = self
            .customer_totals(rows.iter().map(|row| row.id).collect())
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| Customer::assemble(row, &totals))
            .collect())
    }
}

#[async_trait]
impl CustomerSource for DatabaseStore {
    async fn list_customers(&self, query: &CustomerQuery) -> StoreResult<Paginated<Customer>> {
        let Paginated {
            items,
            total,
            page,
            total_pages,
        } = self.fetch_page::<user::Entity, _, _>(query).await?;
        Ok(Paginated {
            items: self.customer_views(items).await?,
            total,
            page,
            total_pages,
        })
    }

    async fn customer_by_id(&self, id: i32) -> StoreResult<Option<Customer>> {
        let row = user::Entity::find_by_id(id).one(self.connection()).await?;
        Ok(self.customer_views(row.into_iter().collect()).await?.pop())
    }

    async fn customer_stats(&self) -> StoreResult<CustomerStats> {
        let db = self.connection();
        let customers = || user::Entity::find().filter(user::Column::Role.eq(Role::Customer));
        let (total_customers, active_customers, verified_customers, admin_users) = tokio::try_join!(
            customers().count(db),
            customers()
                .filter(user::Column::IsActive.eq(true))
                .count(db),
            customers()
                .filter(user::Column::EmailVerified.eq(true))
                .count(db),
            user::Entity::find()
                .filter(user::Column::Role.eq(Role::Admin))
                .count(db),
        )?;
        Ok(CustomerStats {
            total_customers,
            active_customers,
            verified_customers,
            admin_users,
        })
    }

    async fn update_customer(&self, id: i32, patch: CustomerPatch) -> StoreResult<Customer> {
        let mut row = user::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .ok_or_else(|| StoreError::not_found("customer", id))?;
        patch.apply(&mut row, Utc::now());
        let taken = self
            .exists::<user::Entity>(
                Condition::all()
                    .add(user::Column::Email.eq(row.email.as_str()))
                    .add(user::Column::Id.ne(id)),
            )
            .await?;
        if taken {
            return Err(conflict("Customer", "email", &row.email));
        }
        let active: user::ActiveModel = row.into();
        let updated = self.save(active).await?;
        self.customer_views(vec![updated])
            .await?
            .pop()
            .ok_or_else(|| StoreError::not_found("customer", id))
    }
}
