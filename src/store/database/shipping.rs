use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};

use super::DatabaseStore;
use crate::entities::{shipping_method, shipping_zone};
use crate::error::{StoreError, StoreResult};
use crate::models::shipping::{group_methods, ShippingMethod};
use crate::models::{
    NewShippingMethod, NewShippingZone, ShippingMethodPatch, ShippingZone, ShippingZonePatch,
};
use crate::store::{conflict, ShippingSource};

impl DatabaseStore {
    async fn zone_views(&self, zones: Vec<shipping_zone::Model>) -> StoreResult<Vec<ShippingZone>> {
        let ids: Vec<i32> = zones.iter().map(|zone| zone.id).collect();
        let methods = if ids.is_empty() {
            Vec::new()
        } else {
            shipping_method::Entity::find()
                .filter(shipping_method::Column::ZoneId.is_in(ids))
                .all(self.connection())
                .await?
        };
        let mut methods = group_methods(methods);
        Ok(zones
            .into_iter()
            .map(|zone| ShippingZone::assemble(zone, &mut methods))
            .collect())
    }

    async fn check_zone_name(&self, id: i32, name: &str) -> StoreResult<()> {
        let taken = self
            .exists::<shipping_zone::Entity>(
                Condition::all()
                    .add(shipping_zone::Column::Name.eq(name))
                    .add(shipping_zone::Column::Id.ne(id)),
            )
            .await?;
        if taken {
            return Err(conflict("Shipping zone", "name", name));
        }
        Ok(())
    }
}

#[async_trait]
impl ShippingSource for DatabaseStore {
    async fn shipping_zones(&self) -> StoreResult<Vec<ShippingZone>> {
        let zones = shipping_zone::Entity::find()
            .order_by_asc(shipping_zone::Column::SortOrder)
            .order_by_asc(shipping_zone::Column::Id)
            .all(self.connection())
            .await?;
        self.zone_views(zones).await
    }

    async fn shipping_zone_by_id(&self, id: i32) -> StoreResult<Option<ShippingZone>> {
        let zone = shipping_zone::Entity::find_by_id(id)
            .one(self.connection())
            .await?;
        Ok(self.zone_views(zone.into_iter().collect()).await?.pop())
    }

    async fn create_shipping_zone(&self, input: NewShippingZone) -> StoreResult<ShippingZone> {
        self.check_zone_name(0, &input.name).await?;
        let active: shipping_zone::ActiveModel = input.into_model(0, Utc::now()).into();
        let created = self.insert_new(active, shipping_zone::Column::Id).await?;
        self.zone_views(vec![created])
            .await?
            .pop()
            .ok_or_else(|| StoreError::not_found("shipping zone", "new"))
    }

    async fn update_shipping_zone(
        &self,
        id: i32,
        patch: ShippingZonePatch,
    ) -> StoreResult<ShippingZone> {
        let mut row = shipping_zone::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .ok_or_else(|| StoreError::not_found("shipping zone", id))?;
        patch.apply(&mut row, Utc::now());
        self.check_zone_name(id, &row.name).await?;
        let active: shipping_zone::ActiveModel = row.into();
        let updated = self.save(active).await?;
        self.zone_views(vec![updated])
            .await?
            .pop()
            .ok_or_else(|| StoreError::not_found("shipping zone", id))
    }

    async fn create_shipping_method(
        &self,
        zone_id: i32,
        input: NewShippingMethod,
    ) -> StoreResult<ShippingMethod> {
        if shipping_zone::Entity::find_by_id(zone_id)
            .one(self.connection())
            .await?
            .is_none()
        {
            return Err(StoreError::not_found("shipping zone", zone_id));
        }
        let active: shipping_method::ActiveModel =
            input.into_model(0, zone_id, Utc::now()).into();
        self.insert_new(active, shipping_method::Column::Id).await
    }

    async fn update_shipping_method(
        &self,
        id: i32,
        patch: ShippingMethodPatch,
    ) -> StoreResult<ShippingMethod> {
        let mut row = shipping_method::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .ok_or_else(|| StoreError::not_found("shipping method", id))?;
        patch.apply(&mut row, Utc::now());
        let active: shipping_method::ActiveModel = row.into();
        self.save(active).await
    }
}
