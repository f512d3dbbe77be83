//! Catalog and health endpoints.

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use brewdesk_integration_tests::TestApp;

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::empty().await.unwrap();

    let live = app.get("/health").await.unwrap();
    assert_eq!(live.status, StatusCode::OK);

    let ready = app.get("/health/ready").await.unwrap();
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_products_sorted_by_category_then_name() {
    let app = TestApp::seeded().await.unwrap();

    let response = app.get("/api/products").await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);

    let products = response.body["data"].as_array().unwrap();
    assert_eq!(products.len(), 10);

    let first = &products[0];
    assert_eq!(first["name"], "Americano");
    assert_eq!(first["category"], "Coffee");
    assert_eq!(first["price"].as_f64(), Some(25.0));
    assert_eq!(first["is_active"], true);

    let pairs: Vec<(String, String)> = products
        .iter()
        .map(|p| {
            (
                p["category"].as_str().unwrap().to_owned(),
                p["name"].as_str().unwrap().to_owned(),
            )
        })
        .collect();
    let mut sorted = pairs.clone();
    sorted.sort();
    assert_eq!(pairs, sorted);
}

#[tokio::test]
async fn test_inactive_products_are_hidden() {
    let app = TestApp::seeded().await.unwrap();
    sqlx::query("UPDATE product SET is_active = 0 WHERE name = 'Mocha'")
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app.get("/api/products").await.unwrap();
    let products = response.body["data"].as_array().unwrap();
    assert_eq!(products.len(), 9);
    assert!(products.iter().all(|p| p["name"] != "Mocha"));
}

#[tokio::test]
async fn test_categories_sorted_by_name() {
    let app = TestApp::seeded().await.unwrap();

    let response = app.get("/api/categories").await.unwrap();
    assert_eq!(response.status, StatusCode::OK);

    let names: Vec<_> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["Coffee", "Dessert", "Light Meal", "Tea"]);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = TestApp::empty().await.unwrap();

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "till-7-0042")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "till-7-0042");

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}
