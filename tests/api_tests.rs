//! API integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

mod common;
use common::create_test_router;

/// Helper to make a GET request and decode the JSON body
async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let ctx = create_test_router();

    let (status, body) = get_json(&ctx.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "MQTT alert bridge");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_user_devices_lookup_subscribes_each_topic() {
    let ctx = create_test_router();
    ctx.store
        .insert_user_document("alice", json!({"devices": ["d1", "d2"]}));

    let (status, body) = get_json(&ctx.app, "/user/alice").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["devices"], json!(["d1", "d2"]));
    assert_eq!(
        ctx.subscriber.subscribed_topics(),
        vec!["pets_live/d1/alert", "pets_live/d2/alert"]
    );
}

#[tokio::test]
async fn test_unknown_user_gets_empty_list_with_ok_status() {
    let ctx = create_test_router();

    let (status, body) = get_json(&ctx.app, "/user/ghost").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["devices"], json!([]));
    assert!(ctx.subscriber.subscribed_topics().is_empty());
}

#[tokio::test]
async fn test_device_map_document_yields_key_list() {
    let ctx = create_test_router();
    ctx.store.insert_user_document(
        "bob",
        json!({"devices": {"collar-1": {"nickname": "Rex"}}}),
    );

    let (status, body) = get_json(&ctx.app, "/user/bob").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["devices"], json!(["collar-1"]));
    assert_eq!(
        ctx.subscriber.subscribed_topics(),
        vec!["pets_live/collar-1/alert"]
    );
}

#[tokio::test]
async fn test_repeated_lookup_reissues_subscriptions() {
    let ctx = create_test_router();
    ctx.store
        .insert_user_document("alice", json!({"devices": ["d1"]}));

    get_json(&ctx.app, "/user/alice").await;
    get_json(&ctx.app, "/user/alice").await;

    // No diffing against the prior set: both calls issue the command
    assert_eq!(
        ctx.subscriber.subscribed_topics(),
        vec!["pets_live/d1/alert", "pets_live/d1/alert"]
    );
}
