pub mod admin;

use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::middleware::logging_middleware;
use crate::services::AdminService;
use admin::admin_api_router;

pub fn create_api_router(service: Arc<AdminService>) -> Router {
    Router::new()
        .nest("/api/admin", admin_api_router(service))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
