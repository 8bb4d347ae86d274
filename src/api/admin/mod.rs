pub mod category;
pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod review;
pub mod setting;
pub mod shipping;

use axum::{http::StatusCode, response::Response, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Display;
use std::sync::Arc;

use category::admin_category_router;
use customer::admin_customer_router;
use order::admin_order_router;
use product::admin_product_router;
use report::admin_report_router;
use review::admin_review_router;
use setting::admin_setting_router;
use shipping::admin_shipping_router;

use crate::middleware::{to_response, ApiError};
use crate::models::ActionResult;
use crate::query::{QueryOptions, Sort, SortDirection, SortKey};
use crate::services::AdminService;

pub fn admin_api_router(service: Arc<AdminService>) -> Router {
    Router::new()
        .merge(admin_product_router())
        .merge(admin_category_router())
        .merge(admin_order_router())
        .merge(admin_customer_router())
        .merge(admin_review_router())
        .merge(admin_shipping_router())
        .merge(admin_setting_router())
        .merge(admin_report_router())
        .layer(Extension(service))
}

/// Paging and sorting query parameters. Filters are read by a second
/// `Query` extractor over the same query string.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de>"))]
pub struct ListParams<K> {
    page: Option<u64>,
    limit: Option<u64>,
    sort: Option<K>,
    direction: Option<SortDirection>,
}

impl<K: SortKey> ListParams<K> {
    pub fn into_options<F>(self, filters: F) -> QueryOptions<F, K> {
        QueryOptions {
            page: self.page,
            limit: self.limit,
            filters,
            sort: self.sort.map(|field| Sort {
                field,
                direction: self.direction.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    limit: Option<u64>,
}

impl LimitParams {
    pub fn limit_or(&self, default: u64) -> u64 {
        self.limit.unwrap_or(default)
    }
}

pub fn ok_json<T: Serialize>(body: T) -> Response {
    to_response((StatusCode::OK, Json(body)), Ok(()))
}

pub fn found_json<T: Serialize>(entity: &str, id: impl Display, item: Option<T>) -> Response {
    match item {
        Some(item) => ok_json(item),
        None => {
            let err = ApiError::NotFound(format!("No {entity} with {id} id was found."));
            to_response(
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": err.to_string()
                    })),
                ),
                Err(err),
            )
        }
    }
}

/// 200 (or `created`) with the action result, 400 when it failed.
pub fn action_json<T: Serialize>(
    operation: &'static str,
    success: StatusCode,
    result: ActionResult<T>,
) -> Response {
    match result.error.clone() {
        None => to_response((success, Json(result)), Ok(())),
        Some(message) => to_response(
            (StatusCode::BAD_REQUEST, Json(result)),
            Err(ApiError::ActionFailed { operation, message }),
        ),
    }
}
