use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::{action_json, found_json, ok_json, ListParams};
use crate::query::{ReviewFilters, ReviewSort};
use crate::services::AdminService;

//ROUTERS
pub fn admin_review_router() -> Router {
    Router::new()
        .route("/reviews", get(list_reviews))
        .route("/reviews/stats", get(review_stats))
        .route("/reviews/:id", get(get_review))
        .route("/reviews/:id/approve", post(approve_review))
        .route("/reviews/:id/reject", post(reject_review))
}

//ROUTES
async fn list_reviews(
    Extension(service): Extension<Arc<AdminService>>,
    Query(params): Query<ListParams<ReviewSort>>,
    Query(filters): Query<ReviewFilters>,
) -> impl IntoResponse {
    ok_json(service.reviews(params.into_options(filters)).await)
}

async fn review_stats(Extension(service): Extension<Arc<AdminService>>) -> impl IntoResponse {
    ok_json(service.review_stats().await)
}

async fn get_review(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    found_json("review", id, service.review(id).await)
}

async fn approve_review(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    action_json("approve_review", StatusCode::OK, service.approve_review(id).await)
}

async fn reject_review(
    Extension(service): Extension<Arc<AdminService>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    action_json("reject_review", StatusCode::OK, service.reject_review(id).await)
}
