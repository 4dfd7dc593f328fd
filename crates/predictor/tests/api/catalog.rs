use crate::helpers::{get_json, send, spawn_app, MockClimateAccess, CATEGORIES};
use axum::{body::Body, http::Request};
use hyper::Method;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn lists_provinces_from_climate_data() {
    let mut climate = MockClimateAccess::new();
    climate
        .expect_provinces()
        .times(1)
        .returning(|| vec!["An Giang-Chau Doc".to_string(), "Ha Noi-Ha Noi".to_string()]);

    let test_app = spawn_app(Arc::new(climate)).await;
    let (status, body) = get_json(&test_app, "/provinces").await;

    assert!(status.is_success());
    assert_eq!(body, json!(["An Giang-Chau Doc", "Ha Noi-Ha Noi"]));
}

#[tokio::test]
async fn lists_configured_classes_in_order() {
    let climate = MockClimateAccess::new();
    let test_app = spawn_app(Arc::new(climate)).await;

    let (status, body) = get_json(&test_app, "/classes").await;

    assert!(status.is_success());
    assert_eq!(body, json!(CATEGORIES));
}

#[tokio::test]
async fn serves_api_docs() {
    let climate = MockClimateAccess::new();
    let test_app = spawn_app(Arc::new(climate)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/docs")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&test_app, request).await;

    assert!(status.is_success());
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("/predict"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let climate = MockClimateAccess::new();
    let test_app = spawn_app(Arc::new(climate)).await;

    let (status, _) = get_json(&test_app, "/forecast").await;
    assert_eq!(status.as_u16(), 404);
}
