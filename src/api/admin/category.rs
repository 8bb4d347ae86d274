use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::{action_json, found_json, ok_json, LimitParams, ListParams};
use crate::models::{CategoryPatch, NewCategory};
use crate::query::{CategoryFilters, CategorySort};
use crate::services::AdminService;

const DEFAULT_PRODUCTS_LIMIT: u64 = 20;

//ROUTERS
pub fn admin_category_router() -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/tree", get(category_tree))
        .route("/categories/stats", get(category_stats))
        .route("/categories/slug/:slug", get(get_category_by_slug))
        .route("/categories/:id", get(get_category).patch(patch_category))
        .route("/categories/:id/products", get(category_products))
}

//ROUTES
async fn list_categories(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<ListParams<CategorySort>>,
    Query(filters): Query<CategoryFilters>,
) -> impl IntoResponse {
    ok_json(service.categories(params.into_options(filters)).await)
}

async fn category_tree(Extension(service): Extension<Arc<AdminService>>) -> impl IntoResponse {
    ok_json(service.category_tree().await)
}

async fn category_stats(Extension(service): Extension<Arc<AdminService>>) -> impl IntoResponse {
    ok_json(service.category_stats().await)
}

async fn get_category(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    found_json("category", id, service.category(id).await)
}

async fn get_category_by_slug(
    Extension(service): Extension<Arc<AdminService>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let category = service.category_by_slug(&slug).await;
    found_json("category", slug, category)
}

/// Active products of one category, by name.
async fn category_products(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    ok_json(
        service
            .products_by_category(id, params.limit_or(DEFAULT_PRODUCTS_LIMIT))
            .await,
    )
}

async fn create_category(
    Extension(service): Extension<Arc<AdminService>>,
    Json(payload): Json<NewCategory>,
) -> impl IntoResponse {
    action_json(
        "create_category",
        StatusCode::CREATED,
        service.create_category(payload).await,
    )
}

async fn patch_category(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPatch>,
) -> impl IntoResponse {
    action_json(
        "update_category",
        StatusCode::OK,
        service.update_category(id, payload).await,
    )
}
