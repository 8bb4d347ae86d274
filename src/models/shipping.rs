use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::NOT_BLANK;
use crate::entities::types::StringList;
use crate::entities::{shipping_method, shipping_zone};

pub type ShippingMethod = shipping_method::Model;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShippingZone {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub regions: Vec<String>,
    pub sort_order: i32,
    pub is_active: bool,
    /// Ordered by `sort_order`, then id.
    pub methods: Vec<ShippingMethod>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ShippingZone {
    pub fn assemble(
        row: shipping_zone::Model,
        methods: &mut HashMap<i32, Vec<ShippingMethod>>,
    ) -> Self {
        let mut own = methods.remove(&row.id).unwrap_or_default();
        own.sort_by_key(|method| (method.sort_order, method.id));
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            regions: row.regions.0,
            sort_order: row.sort_order,
            is_active: row.is_active,
            methods: own,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub fn group_methods(
    methods: impl IntoIterator<Item = ShippingMethod>,
) -> HashMap<i32, Vec<ShippingMethod>> {
    let mut grouped: HashMap<i32, Vec<ShippingMethod>> = HashMap::new();
    for method in methods {
        grouped.entry(method.zone_id).or_default().push(method);
    }
    grouped
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewShippingZone {
    #[validate(regex(path = *NOT_BLANK, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "sort_order must not be negative"))]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewShippingZone {
    pub fn into_model(self, id: i32, now: DateTimeUtc) -> shipping_zone::Model {
        shipping_zone::Model {
            id,
            name: self.name,
            description: self.description,
            regions: StringList(self.regions),
            sort_order: self.sort_order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ShippingZonePatch {
    #[validate(regex(path = *NOT_BLANK, message = "name is required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub regions: Option<Vec<String>>,
    #[validate(range(min = 0, message = "sort_order must not be negative"))]
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl ShippingZonePatch {
    pub fn apply(self, row: &mut shipping_zone::Model, now: DateTimeUtc) {
        if let Some(name) = self.name {
            row.name = name;
        }
        if let Some(description) = self.description {
            row.description = Some(description);
        }
        if let Some(regions) = self.regions {
            row.regions = StringList(regions);
        }
        if let Some(sort_order) = self.sort_order {
            row.sort_order = sort_order;
        }
        if let Some(is_active) = self.is_active {
            row.is_active = is_active;
        }
        row.updated_at = now;
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewShippingMethod {
    #[validate(regex(path = *NOT_BLANK, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    #[validate(regex(path = *NOT_BLANK, message = "estimated_days is required"))]
    pub estimated_days: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "sort_order must not be negative"))]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewShippingMethod {
    pub fn into_model(self, id: i32, zone_id: i32, now: DateTimeUtc) -> shipping_method::Model {
        shipping_method::Model {
            id,
            zone_id,
            name: self.name,
            description: self.description,
            price: self.price,
            estimated_days: self.estimated_days,
            sort_order: self.sort_order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ShippingMethodPatch {
    #[validate(regex(path = *NOT_BLANK, message = "name is required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
    #[validate(regex(path = *NOT_BLANK, message = "estimated_days is required"))]
    pub estimated_days: Option<String>,
    #[validate(range(min = 0, message = "sort_order must not be negative"))]
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl ShippingMethodPatch {
    pub fn apply(self, row: &mut shipping_method::Model, now: DateTimeUtc) {
        if let Some(name) = self.name {
            row.name = name;
        }
        if let Some(description) = self.description {
            row.description = Some(description);
        }
        if let Some(price) = self.price {
            row.price = price;
        }
        if let Some(estimated_days) = self.estimated_days {
            row.estimated_days = estimated_days;
        }
        if let Some(sort_order) = self.sort_order {
            row.sort_order = sort_order;
        }
        if let Some(is_active) = self.is_active {
            row.is_active = is_active;
        }
        row.updated_at = now;
    }
}
