mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::DateTime;
use common::{FakeUploader, get, json_body, post_json, spawn_app};
use linkpage::types::site_data::DEFAULT_SITE_DATA;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_ok_with_timestamp() {
    let t = spawn_app(FakeUploader::default()).await;

    let resp = t.app.clone().oneshot(get("/health")).await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["status"], "OK");
    let ts = body["timestamp"].as_str().expect("timestamp is a string");
    assert!(DateTime::parse_from_rfc3339(ts).is_ok());
}

#[tokio::test]
async fn empty_store_serves_default_payload() {
    let t = spawn_app(FakeUploader::default()).await;

    let resp = t
        .app
        .clone()
        .oneshot(get("/api/site-data"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body, *DEFAULT_SITE_DATA);
    assert_eq!(body["profile"]["name"], "Mẹ Bỉm Sữa Review");
    assert_eq!(body["categories"], json!([]));
    assert!(body.get("lastUpdated").is_none());
}

#[tokio::test]
async fn default_payload_is_not_persisted() {
    let t = spawn_app(FakeUploader::default()).await;

    for _ in 0..2 {
        let resp = t.app.clone().oneshot(get("/api/site-data")).await.unwrap();
        assert_eq!(json_body(resp).await, *DEFAULT_SITE_DATA);
    }
}

#[tokio::test]
async fn save_then_get_returns_body_with_last_updated() {
    let t = spawn_app(FakeUploader::default()).await;

    let posted = json!({
        "profile": {"name": "Shop", "bio": "hello", "avatar": "https://drive.google.com/uc?id=a"},
        "backgroundImage": "https://drive.google.com/uc?id=b",
        "categories": [{"title": "Toys", "links": []}],
    });

    let resp = t
        .app
        .clone()
        .oneshot(post_json("/api/site-data", &posted))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body, json!({"success": true, "message": "Site data saved successfully"}));

    let resp = t.app.clone().oneshot(get("/api/site-data")).await.unwrap();
    let mut stored = json_body(resp).await;
    let last_updated = stored
        .as_object_mut()
        .and_then(|obj| obj.remove("lastUpdated"))
        .expect("lastUpdated was stamped");
    let last_updated = last_updated.as_str().expect("lastUpdated is a string");
    assert!(DateTime::parse_from_rfc3339(last_updated).is_ok());
    assert!(last_updated.ends_with('Z'));
    assert_eq!(stored, posted);
}

#[tokio::test]
async fn save_overwrites_without_merging() {
    let t = spawn_app(FakeUploader::default()).await;

    let first = json!({"profile": {"name": "A"}, "categories": [1]});
    let second = json!({"backgroundImage": "https://example.com/b.png"});
    for body in [&first, &second] {
        let resp = t.app.clone().oneshot(post_json("/api/site-data", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = t.app.clone().oneshot(get("/api/site-data")).await.unwrap();
    let stored = json_body(resp).await;
    assert!(stored.get("profile").is_none());
    assert!(stored.get("categories").is_none());
    assert_eq!(stored["backgroundImage"], "https://example.com/b.png");
}

#[tokio::test]
async fn client_supplied_last_updated_is_replaced() {
    let t = spawn_app(FakeUploader::default()).await;

    let posted = json!({"lastUpdated": "1999-01-01T00:00:00.000Z"});
    t.app.clone().oneshot(post_json("/api/site-data", &posted)).await.unwrap();

    let resp = t.app.clone().oneshot(get("/api/site-data")).await.unwrap();
    let stored = json_body(resp).await;
    assert_ne!(stored["lastUpdated"], "1999-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn concurrent_saves_leave_exactly_one_body() {
    let t = spawn_app(FakeUploader::default()).await;

    let bodies: Vec<_> = (0..8)
        .map(|i| json!({"profile": {"name": format!("writer-{i}")}, "categories": [i]}))
        .collect();

    let responses = futures::future::join_all(
        bodies
            .iter()
            .map(|body| t.app.clone().oneshot(post_json("/api/site-data", body))),
    )
    .await;
    for resp in responses {
        assert_eq!(resp.expect("request failed").status(), StatusCode::OK);
    }

    let resp = t.app.clone().oneshot(get("/api/site-data")).await.unwrap();
    let mut stored = json_body(resp).await;
    stored.as_object_mut().unwrap().remove("lastUpdated");
    assert!(
        bodies.contains(&stored),
        "stored document {stored} is not one of the posted bodies"
    );
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let t = spawn_app(FakeUploader::default()).await;

    let resp = t
        .app
        .clone()
        .oneshot(post_json("/api/site-data", &json!([1, 2, 3])))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json_body(resp).await["error"].is_string());

    let resp = t.app.clone().oneshot(get("/api/site-data")).await.unwrap();
    assert_eq!(json_body(resp).await, *DEFAULT_SITE_DATA);
}

#[tokio::test]
async fn malformed_json_gets_a_json_error_body() {
    let t = spawn_app(FakeUploader::default()).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/site-data")
        .header("content-type", "application/json")
        .body(Body::from("{bad"))
        .unwrap();
    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    let message = body["error"].as_str().expect("error is a string");
    assert!(message.contains("JSON"), "{message}");
}

#[tokio::test]
async fn wrong_content_type_gets_a_json_error_body() {
    let t = spawn_app(FakeUploader::default()).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/site-data")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"name":"x"}"#))
        .unwrap();
    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(json_body(resp).await["error"].is_string());
}
