mod common;

use reqwest::StatusCode;
use serde_json::json;

use common::spawn_app;
use shop_admin::orders::TransitionPolicy;

#[tokio::test]
async fn test_customers() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let (_, customer) = app.get_json("/customers/2").await;
    assert_eq!(customer["total_orders"], 2);
    assert_eq!(customer["total_spent"], 93_692);

    let (_, unverified) = app.get_json("/customers?email_verified=false").await;
    assert_eq!(unverified["total"], 2);

    let response = app
        .client
        .patch(app.url("/customers/4"))
        .json(&json!({ "email": "no-es-un-correo" }))
        .send()
        .await
        .expect("Failed to send customer update");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_moderation() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let response = app
        .client
        .post(app.url("/reviews/3/approve"))
        .send()
        .await
        .expect("Failed to send approve request");
    assert_eq!(response.status(), StatusCode::OK);

    let (_, pending) = app.get_json("/reviews?is_approved=false").await;
    assert_eq!(pending["total"], 1);

    let (_, stats) = app.get_json("/reviews/stats").await;
    assert_eq!(stats["approvedReviews"], 3);

    let missing = app
        .client
        .post(app.url("/reviews/40/reject"))
        .send()
        .await
        .expect("Failed to send reject request");
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_settings() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let (_, checkout) = app.get_json("/settings?category=checkout").await;
    assert_eq!(checkout.as_array().map(Vec::len), Some(2));

    let response = app
        .client
        .patch(app.url("/settings/maintenance_mode"))
        .json(&json!({ "value": true }))
        .send()
        .await
        .expect("Failed to send setting update");
    assert_eq!(response.status(), StatusCode::OK);

    let (_, setting) = app.get_json("/settings/maintenance_mode").await;
    assert_eq!(setting["value"], true);

    let wrong_type = app
        .client
        .patch(app.url("/settings/tax_rate"))
        .json(&json!({ "value": "diecinueve" }))
        .send()
        .await
        .expect("Failed to send setting update");
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shipping() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let response = app
        .client
        .post(app.url("/shipping/zones/2/methods"))
        .json(&json!({
            "name": "Contraentrega",
            "price": 10000,
            "estimated_days": "3-5",
            "sort_order": 3
        }))
        .send()
        .await
        .expect("Failed to send shipping method request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let (_, zone) = app.get_json("/shipping/zones/2").await;
    assert_eq!(zone["methods"].as_array().map(Vec::len), Some(3));

    let orphan = app
        .client
        .post(app.url("/shipping/zones/9/methods"))
        .json(&json!({ "name": "Sin zona", "price": 0, "estimated_days": "1" }))
        .send()
        .await
        .expect("Failed to send shipping method request");
    assert_eq!(orphan.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_and_reports() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let (status, dashboard) = app.get_json("/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["products"]["totalProducts"], 7);
    assert_eq!(dashboard["recentOrders"].as_array().map(Vec::len), Some(5));
    assert_eq!(dashboard["lowStock"].as_array().map(Vec::len), Some(3));

    let (_, report) = app
        .get_json("/reports/sales?from=2024-06-05T00:00:00Z&to=2024-06-07T09:00:00Z")
        .await;
    assert_eq!(report["totalOrders"], 3);
    assert_eq!(report["paidOrders"], 2);
    assert_eq!(report["totalRevenue"], 77_625);
}
