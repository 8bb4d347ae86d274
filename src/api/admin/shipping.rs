use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use std::sync::Arc;

use super::{action_json, found_json, ok_json};
use crate::models::{NewShippingMethod, NewShippingZone, ShippingMethodPatch, ShippingZonePatch};
use crate::services::AdminService;

//ROUTERS
pub fn admin_shipping_router() -> Router {
    Router::new()
        .route(
            "/shipping/zones",
            get(list_shipping_zones).post(create_shipping_zone),
        )
        .route(
            "/shipping/zones/:id",
            get(get_shipping_zone).patch(patch_shipping_zone),
        )
        .route("/shipping/zones/:id/methods", post(create_shipping_method))
        .route("/shipping/methods/:id", patch(patch_shipping_method))
}

//ROUTES
async fn list_shipping_zones(
    Extension(service): Extension<Arc<AdminService>>,
) -> impl IntoResponse {
    ok_json(service.shipping_zones().await)
}

async fn get_shipping_zone(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    found_json("shipping zone", id, service.shipping_zone(id).await)
}

async fn create_shipping_zone(
    Extension(service): Extension<Arc<AdminService>>,
    Json(payload): Json<NewShippingZone>,
) -> impl IntoResponse {
    action_json(
        "create_shipping_zone",
        StatusCode::CREATED,
        service.create_shipping_zone(payload).await,
    )
}

async fn patch_shipping_zone(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Json(payload): Json<ShippingZonePatch>,
) -> impl IntoResponse {
    action_json(
        "update_shipping_zone",
        StatusCode::OK,
        service.update_shipping_zone(id, payload).await,
    )
}

async fn create_shipping_method(
    Extension(service): Extension<Arc<AdminService>>,
    Path(zone_id): Path<i32>,
    Json(payload): Json<NewShippingMethod>,
) -> impl IntoResponse {
    action_json(
        "create_shipping_method",
        StatusCode::CREATED,
        service.create_shipping_method(zone_id, payload).await,
    )
}

async fn patch_shipping_method(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
    Json(payload): Json<ShippingMethodPatch>,
) -> impl IntoResponse {
    action_json(
        "update_shipping_method",
        StatusCode::OK,
        service.update_shipping_method(id, payload).await,
    )
}
