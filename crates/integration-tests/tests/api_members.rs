//! Customer creation and member registration/login.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use brewdesk_integration_tests::TestApp;

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::empty().await.unwrap();

    let registered = app
        .post(
            "/api/auth/register",
            &json!({
                "name": "Dana Lee",
                "email": "dana@example.com",
                "password": "s3cret-pass",
                "phone": "13700000000",
                "date_of_birth": "1994-02-03",
            }),
        )
        .await
        .unwrap();
    assert_eq!(registered.status, StatusCode::OK);
    assert_eq!(registered.body["success"], true);
    assert_eq!(registered.body["data"]["name"], "Dana Lee");
    assert_eq!(registered.body["data"]["email"], "dana@example.com");
    let customer_id = registered.body["data"]["customer_id"].as_i64().unwrap();

    let login = app
        .post(
            "/api/auth/login",
            &json!({"email": "dana@example.com", "password": "s3cret-pass"}),
        )
        .await
        .unwrap();
    assert_eq!(login.status, StatusCode::OK);

    let profile = &login.body["data"];
    assert_eq!(profile["customer_id"].as_i64(), Some(customer_id));
    assert_eq!(profile["customer_type"], "member");
    assert_eq!(profile["date_of_birth"], "1994-02-03");
    assert!(profile["registration_date"].is_string());
    assert!(profile.get("password_hash").is_none());
    assert!(!login.body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_seeded_member_can_log_in() {
    let app = TestApp::seeded().await.unwrap();

    let login = app
        .post(
            "/api/auth/login",
            &json!({"email": "sarah@example.com", "password": "123456"}),
        )
        .await
        .unwrap();
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["data"]["name"], "Sarah Johnson");
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let app = TestApp::seeded().await.unwrap();

    let attempts = [
        json!({"email": "sarah@example.com", "password": "wrong"}),
        json!({"email": "nobody@example.com", "password": "123456"}),
        json!({"email": "john@example.com", "password": "123456"}),
    ];
    for body in &attempts {
        let response = app.post("/api/auth/login", body).await.unwrap();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "body: {body}");
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["error"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_incomplete_forms_are_bad_requests() {
    let app = TestApp::empty().await.unwrap();

    let registrations = [
        json!({"email": "x@example.com", "password": "pw"}),
        json!({"name": "X", "password": "pw"}),
        json!({"name": "X", "email": "x@example.com"}),
        json!({"name": "X", "email": "not-an-email", "password": "pw"}),
        json!({"name": "X", "email": "x@example.com", "password": "pw", "date_of_birth": "03/02/1994"}),
    ];
    for body in &registrations {
        let response = app.post("/api/auth/register", body).await.unwrap();
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
    }

    let response = app
        .post("/api/auth/login", &json!({"email": "x@example.com"}))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customer")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_customer() {
    let app = TestApp::empty().await.unwrap();

    let body = json!({
        "name": "Walk-in",
        "phone": "13811112222",
        "email": "walkin@example.com",
    });
    let first = app.post("/api/customers", &body).await.unwrap();
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["success"], true);

    let second = app.post("/api/customers", &body).await.unwrap();
    assert_eq!(second.status, StatusCode::OK);
    assert_ne!(first.body["customer_id"], second.body["customer_id"]);

    let missing = app
        .post("/api/customers", &json!({"phone": "1"}))
        .await
        .unwrap();
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"], "Customer name is required");
}
