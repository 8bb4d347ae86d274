use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;
use std::collections::HashMap;

use super::{CustomerRef, ProductRef};
use crate::entities::{product, review, user};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub order_id: Option<i32>,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub verified_purchase: bool,
    pub is_approved: bool,
    pub user: Option<CustomerRef>,
    pub product: Option<ProductRef>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Review {
    pub fn assemble(
        row: review::Model,
        users: &HashMap<i32, user::Model>,
        products: &HashMap<i32, product::Model>,
    ) -> Self {
        Self {
            user: users.get(&row.user_id).map(CustomerRef::from),
            product: products.get(&row.product_id).map(ProductRef::from),
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            order_id: row.order_id,
            rating: row.rating,
            title: row.title,
            comment: row.comment,
            verified_purchase: row.verified_purchase,
            is_approved: row.is_approved,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: u64,
    pub approved_reviews: u64,
    pub pending_reviews: u64,
    pub verified_purchases: u64,
    /// Mean rating over all reviews, 0 when there are none.
    pub average_rating: f64,
}

impl ReviewStats {
    pub fn with_average(mut self, ratings: impl IntoIterator<Item = i32>) -> Self {
        let (count, sum) = ratings
            .into_iter()
            .fold((0u64, 0i64), |(count, sum), rating| (count + 1, sum + i64::from(rating)));
        self.average_rating = if count == 0 {
            0.0
        } else {
            // Two decimals, as shown on the dashboard.
            ((sum as f64 / count as f64) * 100.0).round() / 100.0
        };
        self
    }

    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a review::Model> + Clone) -> Self {
        let stats = rows.clone().into_iter().fold(Self::default(), |mut stats, row| {
            stats.total_reviews += 1;
            stats.approved_reviews += u64::from(row.is_approved);
            stats.pending_reviews += u64::from(!row.is_approved);
            stats.verified_purchases += u64::from(row.verified_purchase);
            stats
        });
        stats.with_average(rows.into_iter().map(|row| row.rating))
    }
}
