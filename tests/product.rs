mod common;

use reqwest::StatusCode;
use serde_json::json;

use common::spawn_app;
use shop_admin::orders::TransitionPolicy;

#[tokio::test]
async fn test_list_products_sorted_and_paginated() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let (status, body) = app
        .get_json("/products?page=1&limit=2&sort=price&direction=asc")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 7);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalPages"], 4);
    let prices: Vec<i64> = body["items"]
        .as_array()
        .expect("items array")
        .iter()
        .filter_map(|p| p["price"].as_i64())
        .collect();
    assert_eq!(prices, vec![4500, 6200]);

    let (_, beyond) = app.get_json("/products?page=9&limit=5").await;
    assert_eq!(beyond["items"], json!([]));
    assert_eq!(beyond["total"], 7);
}

#[tokio::test]
async fn test_product_filters() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let (_, active) = app.get_json("/products?is_active=true").await;
    assert_eq!(active["total"], 6);

    let (_, low) = app.get_json("/products?low_stock=true&limit=1").await;
    assert_eq!(low["total"], 3);
    assert_eq!(low["totalPages"], 3);

    let (_, by_sku) = app.get_json("/products?search=snk").await;
    assert_eq!(by_sku["total"], 2);

    let (_, joined) = app.get_json("/products/slug/granola-artesanal-miel").await;
    assert_eq!(joined["category"]["slug"], "granolas");
}

#[tokio::test]
async fn test_get_missing_product() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let (status, body) = app.get_json("/products/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No product with 999 id was found.");
}

#[tokio::test]
async fn test_create_product() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let payload = json!({
        "name": "Panela pulverizada",
        "slug": "panela-pulverizada",
        "sku": "END-008",
        "price": 7900,
        "stock_quantity": 25,
        "category_id": 1
    });
    let response = app
        .client
        .post(app.url("/products"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send create product request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse create product response JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 8);

    let duplicate = app
        .client
        .post(app.url("/products"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send duplicate product request");
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let invalid = app
        .client
        .post(app.url("/products"))
        .json(&json!({
            "name": "Sin slug válido",
            "slug": "Sin Slug",
            "sku": "END-009",
            "price": 100
        }))
        .send()
        .await
        .expect("Failed to send invalid product request");
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body = invalid
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse invalid product response JSON");
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Failed to validate")));
}

#[tokio::test]
async fn test_adjust_stock() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let response = app
        .client
        .patch(app.url("/products/2/stock"))
        .json(&json!({ "stock_quantity": 50 }))
        .send()
        .await
        .expect("Failed to send stock request");
    assert_eq!(response.status(), StatusCode::OK);

    let (_, stats) = app.get_json("/products/stats").await;
    assert_eq!(stats["lowStockProducts"], 2);
    assert_eq!(stats["outOfStockProducts"], 1);

    let negative = app
        .client
        .patch(app.url("/products/2/stock"))
        .json(&json!({ "stock_quantity": -1 }))
        .send()
        .await
        .expect("Failed to send stock request");
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);
}
