//! Smoke test against a running server.
//!
//! ```bash
//! BREWDESK_BASE_URL=http://localhost:5050 cargo test -p brewdesk-integration-tests -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use serde_json::Value;

fn base_url() -> String {
    std::env::var("BREWDESK_BASE_URL").unwrap_or_else(|_| "http://localhost:5050".to_owned())
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_running_server_serves_catalog() {
    let client = reqwest::Client::new();
    let base = base_url();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert!(health.status().is_success());

    let products: Value = client
        .get(format!("{base}/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products["success"], true);
    assert!(products["data"].is_array());
}
