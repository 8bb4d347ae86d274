use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::{action_json, found_json, ok_json, LimitParams, ListParams};
use crate::models::OrderUpdate;
use crate::query::{OrderFilters, OrderSort};
use crate::services::AdminService;

const DEFAULT_RECENT_LIMIT: u64 = 10;

//ROUTERS
pub fn admin_order_router() -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/stats", get(order_stats))
        .route("/orders/recent", get(recent_orders))
        .route("/orders/number/:order_number", get(get_order_by_number))
        .route("/orders/:id", get(get_order).patch(patch_order))
}

//ROUTES
async fn list_orders(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<ListParams<OrderSort>>,
    Query(filters): Query<OrderFilters>,
) -> impl IntoResponse {
    ok_json(service.orders(params.into_options(filters)).await)
}

async fn order_stats(Extension(service): Extension<Arc<AdminService>>) -> impl IntoResponse {
    ok_json(service.order_stats().await)
}

async fn recent_orders(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    ok_json(
        service
            .recent_orders(params.limit_or(DEFAULT_RECENT_LIMIT))
            .await,
    )
}

async fn get_order(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    found_json("order", id, service.order(id).await)
}

async fn get_order_by_number(
    Extension(service): Extension<Arc<AdminService>>,
    Path(order_number): Path<String>,
) -> impl IntoResponse {
    let order = service.order_by_number(&order_number).await;
    found_json("order", order_number, order)
}

/// Status, payment status, tracking number and admin notes. Amounts are
/// read only.
async fn patch_order(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Json(payload): Json<OrderUpdate>,
) -> impl IntoResponse {
    action_json(
        "update_order",
        StatusCode::OK,
        service.update_order(id, payload).await,
    )
}
