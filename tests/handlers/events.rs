//! Inbound event endpoint tests

use crate::common::TestApp;
use serde_json::{Value, json};
use storefront::services::dialogue::DialogueState;
use storefront::services::store::SessionStore;

#[tokio::test]
async fn test_start_conversation() {
    let app = TestApp::new().await.serve().await;

    let response = app
        .post_event(json!({"conversation_id": "42", "text": "/start"}))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["state"], "MENU");
    assert_eq!(body["reply"]["text"], "Please choose:");
    assert_eq!(body["reply"]["image_url"], Value::Null);
    assert_eq!(
        body["reply"]["options"][0][0],
        json!({"label": "Salmon", "payload": "P1"})
    );
    assert_eq!(body["reply"]["options"][2][0]["payload"], "cart_items");
}

#[tokio::test]
async fn test_walk_to_product_detail() {
    let app = TestApp::new().await.serve().await;

    app.post_event(json!({"conversation_id": "42", "text": "hi"}))
        .await;
    let response = app
        .post_event(json!({"conversation_id": "42", "payload": "P1"}))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["state"], "PRODUCT_DETAIL");
    assert_eq!(body["reply"]["options"][0].as_array().unwrap().len(), 3);
    assert_eq!(body["reply"]["options"][0][1]["payload"], "P1/3");
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let app = TestApp::new().await.serve().await;
    app.store
        .set("42", DialogueState::ProductDetail)
        .await
        .unwrap();

    let response = app
        .post_event(json!({"conversation_id": "42", "payload": "P1/0"}))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "MALFORMED_EVENT");
    assert_eq!(
        app.store.get("42").await.unwrap(),
        Some(DialogueState::ProductDetail)
    );
}

#[tokio::test]
async fn test_missing_conversation_id_is_bad_request() {
    let app = TestApp::new().await.serve().await;

    let empty_id = app
        .post_event(json!({"conversation_id": "", "text": "hi"}))
        .await;
    assert_eq!(empty_id.status(), 400);

    let no_id = app.post_event(json!({"text": "hi"})).await;
    assert_eq!(no_id.status(), 400);
    let body: Value = no_id.json().await.unwrap();
    assert_eq!(body["code"], "MALFORMED_EVENT");
}

#[tokio::test]
async fn test_text_and_payload_together_is_bad_request() {
    let app = TestApp::new().await.serve().await;

    let response = app
        .post_event(json!({"conversation_id": "42", "text": "hi", "payload": "P1"}))
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = TestApp::new().await.serve().await;
    app.store.set("42", DialogueState::Menu).await.unwrap();

    let response = app
        .post_event(json!({"conversation_id": "42", "payload": "P404"}))
        .await;

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(app.store.get("42").await.unwrap(), Some(DialogueState::Menu));
}

#[tokio::test]
async fn test_backend_down_is_service_unavailable() {
    let app = TestApp::new().await.serve().await;
    app.catalog.fail();

    let response = app
        .post_event(json!({"conversation_id": "42", "text": "/start"}))
        .await;

    assert_eq!(response.status(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "BACKEND_UNAVAILABLE");
    assert_eq!(body["error"], "Catalog backend unavailable");
    assert_eq!(app.store.get("42").await.unwrap(), None);
}
