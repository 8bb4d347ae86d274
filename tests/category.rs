mod common;

use reqwest::StatusCode;
use serde_json::json;

use common::spawn_app;
use shop_admin::orders::TransitionPolicy;

#[tokio::test]
async fn test_category_stats_and_tree() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let (status, stats) = app.get_json("/categories/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "totalCategories": 5,
            "activeCategories": 4,
            "mainCategories": 2,
            "subcategories": 3
        })
    );

    let (_, tree) = app.get_json("/categories/tree").await;
    let roots = tree.as_array().expect("tree array");
    assert_eq!(roots.len(), 2);
    let snacks = roots
        .iter()
        .find(|node| node["id"] == 1)
        .expect("root category 1");
    assert_eq!(snacks["children"].as_array().map(Vec::len), Some(2));

    let (_, root_page) = app.get_json("/categories?root_only=true").await;
    assert_eq!(root_page["total"], 2);
}

#[tokio::test]
async fn test_category_products() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let (_, products) = app.get_json("/categories/1/products").await;
    let slugs: Vec<&str> = products
        .as_array()
        .expect("products array")
        .iter()
        .filter_map(|p| p["slug"].as_str())
        .collect();
    assert_eq!(slugs, vec!["barra-cacao-mani", "chips-platano-verde"]);

    let (status, body) = app.get_json("/categories/slug/no-existe").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No category with no-existe id was found.");
}

#[tokio::test]
async fn test_category_moves() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let cycle = app
        .client
        .patch(app.url("/categories/1"))
        .json(&json!({ "parent_id": 2 }))
        .send()
        .await
        .expect("Failed to send patch request");
    assert_eq!(cycle.status(), StatusCode::BAD_REQUEST);

    let missing_parent = app
        .client
        .patch(app.url("/categories/2"))
        .json(&json!({ "parent_id": 99 }))
        .send()
        .await
        .expect("Failed to send patch request");
    assert_eq!(missing_parent.status(), StatusCode::BAD_REQUEST);

    let to_root = app
        .client
        .patch(app.url("/categories/2"))
        .json(&json!({ "parent_id": null }))
        .send()
        .await
        .expect("Failed to send patch request");
    assert_eq!(to_root.status(), StatusCode::OK);
    let body = to_root
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse patch response JSON");
    assert_eq!(body["data"]["parent_id"], serde_json::Value::Null);

    let (_, stats) = app.get_json("/categories/stats").await;
    assert_eq!(stats["mainCategories"], 3);
}

#[tokio::test]
async fn test_create_category() {
    let app = spawn_app(TransitionPolicy::default()).await;

    let response = app
        .client
        .post(app.url("/categories"))
        .json(&json!({
            "name": "Cafés especiales",
            "slug": "cafes-especiales",
            "parent_id": 3
        }))
        .send()
        .await
        .expect("Failed to send create category request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let duplicate = app
        .client
        .post(app.url("/categories"))
        .json(&json!({ "name": "Bebidas", "slug": "bebidas" }))
        .send()
        .await
        .expect("Failed to send duplicate category request");
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
}
