use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{action_json, found_json, ok_json, LimitParams, ListParams};
use crate::models::{NewProduct, ProductPatch};
use crate::query::{ProductFilters, ProductSort};
use crate::services::AdminService;

const DEFAULT_LOOKUP_LIMIT: u64 = 10;

//ROUTERS
pub fn admin_product_router() -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/stats", get(product_stats))
        .route("/products/featured", get(featured_products))
        .route("/products/low-stock", get(low_stock_products))
        .route("/products/slug/:slug", get(get_product_by_slug))
        .route("/products/:id", get(get_product).patch(patch_product))
        .route("/products/:id/stock", patch(adjust_stock))
}

//ROUTES
async fn list_products(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<ListParams<ProductSort>>,
    Query(filters): Query<ProductFilters>,
) -> impl IntoResponse {
    ok_json(service.products(params.into_options(filters)).await)
}

async fn get_product(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    found_json("product", id, service.product(id).await)
}

async fn get_product_by_slug(
    Extension(service): Extension<Arc<AdminService>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let product = service.product_by_slug(&slug).await;
    found_json("product", slug, product)
}

async fn product_stats(Extension(service): Extension<Arc<AdminService>>) -> impl IntoResponse {
    ok_json(service.product_stats().await)
}

async fn featured_products(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    ok_json(
        service
            .featured_products(params.limit_or(DEFAULT_LOOKUP_LIMIT))
            .await,
    )
}

async fn low_stock_products(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    ok_json(
        service
            .low_stock_products(params.limit_or(DEFAULT_LOOKUP_LIMIT))
            .await,
    )
}

async fn create_product(
    Extension(service): Extension<Arc<AdminService>>,
    Json(payload): Json<NewProduct>,
) -> impl IntoResponse {
    action_json(
        "create_product",
        StatusCode::CREATED,
        service.create_product(payload).await,
    )
}

async fn patch_product(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPatch>,
) -> impl IntoResponse {
    action_json(
        "update_product",
        StatusCode::OK,
        service.update_product(id, payload).await,
    )
}

async fn adjust_stock(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Json(payload): Json<StockPayload>,
) -> impl IntoResponse {
    action_json(
        "adjust_stock",
        StatusCode::OK,
        service.adjust_stock(id, payload.stock_quantity).await,
    )
}

//Structs
#[derive(Deserialize)]
struct StockPayload {
    stock_quantity: i32,
}
