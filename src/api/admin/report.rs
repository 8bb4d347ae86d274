use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

use super::ok_json;
use crate::models::DateRange;
use crate::services::AdminService;

//ROUTERS
pub fn admin_report_router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/reports/sales", get(sales_report))
}

//ROUTES
async fn dashboard(Extension(service): Extension<Arc<AdminService>>) -> impl IntoResponse {
    ok_json(service.dashboard().await)
}

/// `from` and `to` are RFC 3339 timestamps; both are optional.
async fn sales_report(
    Extension(service): Extension<Arc<AdminService>>,
    Query(range): Query<DateRange>,
) -> impl IntoResponse {
    ok_json(service.sales_report(range).await)
}
