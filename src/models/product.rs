use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use validator::Validate;

use super::{double_option, CategoryRef, NOT_BLANK, SLUG_PATTERN};
use crate::entities::types::{NutritionalInfo, StringList};
use crate::entities::{category, product};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: i64,
    pub compare_price: Option<i64>,
    pub cost_price: Option<i64>,
    pub stock_quantity: i32,
    pub low_stock_threshold: i32,
    pub brand: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub nutritional_info: BTreeMap<String, Value>,
    pub is_active: bool,
    pub is_featured: bool,
    pub category: Option<CategoryRef>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Product {
    /// Joins a row with its category. A dangling `category_id` yields `None`.
    pub fn assemble(row: product::Model, categories: &HashMap<i32, category::Model>) -> Self {
        let category = row
            .category_id
            .and_then(|id| categories.get(&id))
            .map(CategoryRef::from);

        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            sku: row.sku,
            price: row.price,
            compare_price: row.compare_price,
            cost_price: row.cost_price,
            stock_quantity: row.stock_quantity,
            low_stock_threshold: row.low_stock_threshold,
            brand: row.brand,
            images: row.images.0,
            tags: row.tags.0,
            ingredients: row.ingredients.0,
            nutritional_info: row.nutritional_info.0,
            is_active: row.is_active,
            is_featured: row.is_featured,
            category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn is_low_stock(&self) -> bool {
        product::is_low_stock(self.stock_quantity, self.low_stock_threshold)
    }
}

/// Product reference embedded in other views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub sku: String,
}

impl From<&product::Model> for ProductRef {
    fn from(value: &product::Model) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            slug: value.slug.clone(),
            sku: value.sku.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: u64,
    pub active_products: u64,
    pub featured_products: u64,
    pub low_stock_products: u64,
    pub out_of_stock_products: u64,
}

impl ProductStats {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a product::Model>) -> Self {
        rows.into_iter().fold(Self::default(), |mut stats, row| {
            stats.total_products += 1;
            stats.active_products += u64::from(row.is_active);
            stats.featured_products += u64::from(row.is_featured);
            stats.low_stock_products += u64::from(row.is_low_stock());
            stats.out_of_stock_products += u64::from(row.is_out_of_stock());
            stats
        })
    }
}

fn default_low_stock_threshold() -> i32 {
    5
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(regex(path = *NOT_BLANK, message = "name is required"))]
    pub name: String,
    #[validate(regex(path = *SLUG_PATTERN, message = "slug must be lowercase words separated by hyphens"))]
    pub slug: String,
    pub description: Option<String>,
    #[validate(regex(path = *NOT_BLANK, message = "sku is required"))]
    pub sku: String,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    #[validate(range(min = 0, message = "compare_price must not be negative"))]
    pub compare_price: Option<i64>,
    #[validate(range(min = 0, message = "cost_price must not be negative"))]
    pub cost_price: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "stock_quantity must not be negative"))]
    pub stock_quantity: i32,
    #[serde(default = "default_low_stock_threshold")]
    #[validate(range(min = 0, message = "low_stock_threshold must not be negative"))]
    pub low_stock_threshold: i32,
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub nutritional_info: BTreeMap<String, Value>,
    pub category_id: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

impl NewProduct {
    pub fn into_model(self, id: i32, now: DateTimeUtc) -> product::Model {
        product::Model {
            id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            sku: self.sku,
            price: self.price,
            compare_price: self.compare_price,
            cost_price: self.cost_price,
            stock_quantity: self.stock_quantity,
            low_stock_threshold: self.low_stock_threshold,
            brand: self.brand,
            images: StringList(self.images),
            tags: StringList(self.tags),
            ingredients: StringList(self.ingredients),
            nutritional_info: NutritionalInfo(self.nutritional_info),
            category_id: self.category_id,
            is_active: self.is_active,
            is_featured: self.is_featured,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ProductPatch {
    #[validate(regex(path = *NOT_BLANK, message = "name is required"))]
    pub name: Option<String>,
    #[validate(regex(path = *SLUG_PATTERN, message = "slug must be lowercase words separated by hyphens"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(regex(path = *NOT_BLANK, message = "sku is required"))]
    pub sku: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
    #[validate(range(min = 0, message = "compare_price must not be negative"))]
    pub compare_price: Option<i64>,
    #[validate(range(min = 0, message = "cost_price must not be negative"))]
    pub cost_price: Option<i64>,
    #[validate(range(min = 0, message = "stock_quantity must not be negative"))]
    pub stock_quantity: Option<i32>,
    #[validate(range(min = 0, message = "low_stock_threshold must not be negative"))]
    pub low_stock_threshold: Option<i32>,
    pub brand: Option<String>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
    pub nutritional_info: Option<BTreeMap<String, Value>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl ProductPatch {
    pub fn stock(stock_quantity: i32) -> Self {
        Self {
            stock_quantity: Some(stock_quantity),
            ..Default::default()
        }
    }

    /// Overwrites the fields present in the patch. Totals and other fields
    /// absent from the patch are left as stored.
    pub fn apply(self, row: &mut product::Model, now: DateTimeUtc) {
        if let Some(name) = self.name {
            row.name = name;
        }
        if let Some(slug) = self.slug {
            row.slug = slug;
        }
        if let Some(description) = self.description {
            row.description = Some(description);
        }
        if let Some(sku) = self.sku {
            row.sku = sku;
        }
        if let Some(price) = self.price {
            row.price = price;
        }
        if let Some(compare_price) = self.compare_price {
            row.compare_price = Some(compare_price);
        }
        if let Some(cost_price) = self.cost_price {
            row.cost_price = Some(cost_price);
        }
        if let Some(stock_quantity) = self.stock_quantity {
            row.stock_quantity = stock_quantity;
        }
        if let Some(threshold) = self.low_stock_threshold {
            row.low_stock_threshold = threshold;
        }
        if let Some(brand) = self.brand {
            row.brand = Some(brand);
        }
        if let Some(images) = self.images {
            row.images = StringList(images);
        }
        if let Some(tags) = self.tags {
            row.tags = StringList(tags);
        }
        if let Some(ingredients) = self.ingredients {
            row.ingredients = StringList(ingredients);
        }
        if let Some(info) = self.nutritional_info {
            row.nutritional_info = NutritionalInfo(info);
        }
        if let Some(category_id) = self.category_id {
            row.category_id = category_id;
        }
        if let Some(is_active) = self.is_active {
            row.is_active = is_active;
        }
        if let Some(is_featured) = self.is_featured {
            row.is_featured = is_featured;
        }
        row.updated_at = now;
    }
}
