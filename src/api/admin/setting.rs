use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{action_json, found_json, ok_json};
use crate::services::AdminService;

//ROUTERS
pub fn admin_setting_router() -> Router {
    Router::new()
        .route("/settings", get(list_settings))
        .route("/settings/:key", get(get_setting).patch(patch_setting))
}

//ROUTES
async fn list_settings(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<SettingsQuery>,
) -> impl IntoResponse {
    ok_json(service.settings(params.category.as_deref()).await)
}

async fn get_setting(
    Extension(service): Extension<Arc<AdminService>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let setting = service.setting(&key).await;
    found_json("setting", key, setting)
}

async fn patch_setting(
    Extension(service): Extension<Arc<AdminService>>,
    Path(key): Path<String>,
    Json(payload): Json<SettingPayload>,
) -> impl IntoResponse {
    action_json(
        "update_setting",
        StatusCode::OK,
        service.update_setting(&key, payload.value).await,
    )
}

//Structs
#[derive(Deserialize)]
struct SettingsQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct SettingPayload {
    value: Value,
}
