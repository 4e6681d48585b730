//! Health endpoint tests

use crate::common::TestApp;

#[tokio::test]
async fn test_health_returns_ok() {
    let app = TestApp::new().await.serve().await;

    let response = app
        .client
        .get(app.url("/api/v1/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_health_does_not_touch_catalog() {
    let app = TestApp::new().await.serve().await;

    app.client
        .get(app.url("/api/v1/health"))
        .send()
        .await
        .unwrap();

    assert!(app.catalog.calls().is_empty());
}
