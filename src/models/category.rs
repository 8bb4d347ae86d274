use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::{double_option, NOT_BLANK, SLUG_PATTERN};
use crate::entities::category;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<i32>,
    pub sort_order: i32,
    pub is_active: bool,
    /// Derived from the products table, never stored.
    pub products_count: u64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Category {
    pub fn assemble(row: category::Model, counts: &HashMap<i32, u64>) -> Self {
        Self {
            products_count: counts.get(&row.id).copied().unwrap_or(0),
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            image_url: row.image_url,
            parent_id: row.parent_id,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Counts products per category id.
pub fn count_by_category(category_ids: impl IntoIterator<Item = Option<i32>>) -> HashMap<i32, u64> {
    category_ids
        .into_iter()
        .flatten()
        .fold(HashMap::new(), |mut counts, id| {
            *counts.entry(id).or_insert(0) += 1;
            counts
        })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<&category::Model> for CategoryRef {
    fn from(value: &category::Model) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            slug: value.slug.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub total_categories: u64,
    pub active_categories: u64,
    pub main_categories: u64,
    pub subcategories: u64,
}

impl CategoryStats {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a category::Model>) -> Self {
        let mut stats = rows.into_iter().fold(Self::default(), |mut stats, row| {
            stats.total_categories += 1;
            stats.active_categories += u64::from(row.is_active);
            stats.main_categories += u64::from(row.parent_id.is_none());
            stats
        });
        stats.subcategories = stats.total_categories - stats.main_categories;
        stats
    }
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(regex(path = *NOT_BLANK, message = "name is required"))]
    pub name: String,
    #[validate(regex(path = *SLUG_PATTERN, message = "slug must be lowercase words separated by hyphens"))]
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "sort_order must not be negative"))]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewCategory {
    pub fn into_model(self, id: i32, now: DateTimeUtc) -> category::Model {
        category::Model {
            id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            image_url: self.image_url,
            parent_id: self.parent_id,
            sort_order: self.sort_order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct CategoryPatch {
    #[validate(regex(path = *NOT_BLANK, message = "name is required"))]
    pub name: Option<String>,
    #[validate(regex(path = *SLUG_PATTERN, message = "slug must be lowercase words separated by hyphens"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// `null` moves the category to the root.
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i32>>,
    #[validate(range(min = 0, message = "sort_order must not be negative"))]
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl CategoryPatch {
    pub fn apply(self, row: &mut category::Model, now: DateTimeUtc) {
        if let Some(name) = self.name {
            row.name = name;
        }
        if let Some(slug) = self.slug {
            row.slug = slug;
        }
        if let Some(description) = self.description {
            row.description = Some(description);
        }
        if let Some(image_url) = self.image_url {
            row.image_url = Some(image_url);
        }
        if let Some(parent_id) = self.parent_id {
            row.parent_id = parent_id;
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
