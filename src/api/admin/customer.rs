use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::{action_json, found_json, ok_json, ListParams};
use crate::models::CustomerPatch;
use crate::query::{CustomerFilters, CustomerSort, OrderFilters, OrderSort};
use crate::services::AdminService;

//ROUTERS
pub fn admin_customer_router() -> Router {
    Router::new()
        .route("/customers", get(list_customers))
        .route("/customers/stats", get(customer_stats))
        .route("/customers/:id", get(get_customer).patch(patch_customer))
        .route("/customers/:id/orders", get(customer_orders))
}

//ROUTES
async fn list_customers(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<ListParams<CustomerSort>>,
    Query(filters): Query<CustomerFilters>,
) -> impl IntoResponse {
    ok_json(service.customers(params.into_options(filters)).await)
}

async fn customer_stats(Extension(service): Extension<Arc<AdminService>>) -> impl IntoResponse {
    ok_json(service.customer_stats().await)
}

async fn get_customer(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    found_json("customer", id, service.customer(id).await)
}

async fn customer_orders(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Query(params): Query<ListParams<OrderSort>>,
    Query(filters): Query<OrderFilters>,
) -> impl IntoResponse {
    ok_json(
        service
            .customer_orders(id, params.into_options(filters))
            .await,
    )
}

async fn patch_customer(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Json(payload): Json<CustomerPatch>,
) -> impl IntoResponse {
    action_json(
        "update_customer",
        StatusCode::OK,
        service.update_customer(id, payload).await,
    )
}
