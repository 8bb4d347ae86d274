use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::Value;

use super::DatabaseStore;
use crate::entities::system_setting;
use crate::error::{StoreError, StoreResult};
use crate::models::setting::encode_value;
use crate::models::Setting;
use crate::store::SettingsSource;

impl DatabaseStore {
    async fn setting_row(&self, key: &str) -> StoreResult<Option<system_setting::Model>> {
        Ok(system_setting::Entity::find()
            .filter(system_setting::Column::Key.eq(key))
            .one(self.connection())
            .await?)
    }
}

#[async_trait]
impl SettingsSource for DatabaseStore {
    async fn settings(&self, category: Option<&str>) -> StoreResult<Vec<Setting>> {
        let mut select = system_setting::Entity::find().order_by_asc(system_setting::Column::Key);
        if let Some(category) = category {
            select = select.filter(system_setting::Column::Category.eq(category));
        }
        let rows = select.all(self.connection()).await?;
        Ok(rows.into_iter().map(Setting::from).collect())
    }

    async fn setting(&self, key: &str) -> StoreResult<Option<Setting>> {
        Ok(self.setting_row(key).await?.map(Setting::from))
    }

    async fn update_setting(&self, key: &str, value: Value) -> StoreResult<Setting> {
        let mut row = self
            .setting_row(key)
            .await?
            .ok_or_else(|| StoreError::not_found("setting", key))?;
        row.value = encode_value(row.setting_type, &value).map_err(StoreError::Validation)?;
        row.updated_at = Utc::now();
        let active: system_setting::ActiveModel = row.into();
        Ok(Setting::from(self.save(active).await?))
    }
}
