use crate::helpers::{
    fallback, found, post_json, profile, spawn_app, MockClimateAccess, CATEGORIES,
};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

fn probability_of(prediction: &Value, category: &str) -> f64 {
    prediction["probabilities"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["category"] == category)
        .and_then(|p| p["probability"].as_f64())
        .unwrap()
}

#[tokio::test]
async fn hot_dry_afternoon_in_rainy_season_predicts_clear() {
    let mut climate = MockClimateAccess::new();
    climate
        .expect_lookup()
        .withf(|province| province == "Ho Chi Minh-Ho Chi Minh")
        .times(1)
        .returning(|_| found(profile("Ho Chi Minh-Ho Chi Minh", 28.3, 74.6)));

    let test_app = spawn_app(Arc::new(climate)).await;
    let (status, body) = post_json(
        &test_app,
        "/predict",
        json!({
            "time": "6/30/2025 14:00",
            "province": "Ho Chi Minh-Ho Chi Minh",
            "temperature": 32.0,
            "humidity": 40.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hour"], 14);
    assert_eq!(body["month"], 6);
    assert_eq!(body["province"], "Ho Chi Minh-Ho Chi Minh");

    let prediction = &body["prediction"];
    assert_eq!(prediction["category"], "Clear");
    assert_eq!(prediction["rule"], "hot_and_dry");
    assert_eq!(prediction["location_found"], true);
    assert_eq!(prediction["input_temperature"], 32.0);
    assert_eq!(prediction["input_humidity"], 40.0);

    // 0.49 / 0.2 / 0.13 plus four categories at the 0.01 floor
    let total = 0.86;
    let clear = probability_of(prediction, "Clear");
    assert!((clear - 0.49 / total).abs() < 1e-9);
    assert!((prediction["confidence"].as_f64().unwrap() - clear).abs() < 1e-12);
    assert!((probability_of(prediction, "Mist") - 0.01 / total).abs() < 1e-9);

    let top: Vec<&str> = prediction["top"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["category"].as_str().unwrap())
        .collect();
    assert_eq!(top, ["Clear", "Clouds", "Rain"]);

    let sum: f64 = prediction["probabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["probability"].as_f64().unwrap())
        .sum();
    assert!((sum - 1.0).abs() < 1e-9);
    assert_eq!(
        prediction["probabilities"].as_array().unwrap().len(),
        CATEGORIES.len()
    );
}

#[tokio::test]
async fn missing_readings_use_province_averages() {
    let mut climate = MockClimateAccess::new();
    climate
        .expect_lookup()
        .times(1)
        .returning(|_| found(profile("Lao Cai-Sa Pa", 16.2, 86.1)));

    let test_app = spawn_app(Arc::new(climate)).await;
    let (status, body) = post_json(
        &test_app,
        "/predict",
        json!({"time": "1/15/2025 8:00", "province": "Lao Cai-Sa Pa"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prediction = &body["prediction"];
    assert_eq!(prediction["input_temperature"], 16.2);
    assert_eq!(prediction["input_humidity"], 86.1);
    assert_eq!(prediction["rule"], "very_humid");
    assert_eq!(prediction["climate"]["avg_temp_province"], 16.2);
}

#[tokio::test]
async fn unknown_province_still_returns_prediction() {
    let mut climate = MockClimateAccess::new();
    climate
        .expect_lookup()
        .withf(|province| province == "Atlantis")
        .times(1)
        .returning(|_| fallback(profile("An Giang-Chau Doc", 28.1, 78.4)));

    let test_app = spawn_app(Arc::new(climate)).await;
    let (status, body) = post_json(
        &test_app,
        "/predict",
        json!({"time": "3/2/2025 10:00", "province": "Atlantis"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["province"], "Atlantis");
    let prediction = &body["prediction"];
    assert_eq!(prediction["location_found"], false);
    assert_eq!(prediction["climate"]["province"], "An Giang-Chau Doc");
    assert_eq!(prediction["input_temperature"], 28.1);
    assert_eq!(prediction["input_humidity"], 78.4);
}

#[tokio::test]
async fn humid_rainy_season_night_gives_clear_no_weight() {
    let mut climate = MockClimateAccess::new();
    climate
        .expect_lookup()
        .times(1)
        .returning(|_| found(profile("Ha Noi-Ha Noi", 24.3, 76.5)));

    let test_app = spawn_app(Arc::new(climate)).await;
    let (status, body) = post_json(
        &test_app,
        "/predict",
        json!({
            "time": "7/20/2025 22:00",
            "province": "Ha Noi-Ha Noi",
            "temperature": 28.0,
            "humidity": 85.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prediction = &body["prediction"];
    assert_eq!(prediction["rule"], "warm_and_humid");
    assert_eq!(prediction["category"], "Rain");
    assert_eq!(probability_of(prediction, "Clear"), 0.0);
    assert!(probability_of(prediction, "Mist") > 0.0);
}

#[tokio::test]
async fn malformed_timestamp_is_rejected() {
    let mut climate = MockClimateAccess::new();
    climate.expect_lookup().times(0);

    let test_app = spawn_app(Arc::new(climate)).await;
    let (status, _) = post_json(
        &test_app,
        "/predict",
        json!({"time": "next tuesday", "province": "Ha Noi-Ha Noi"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_humidity_is_rejected() {
    let mut climate = MockClimateAccess::new();
    climate.expect_lookup().times(0);

    let test_app = spawn_app(Arc::new(climate)).await;
    let (status, _) = post_json(
        &test_app,
        "/predict",
        json!({
            "time": "6/30/2025 14:00",
            "province": "Ha Noi-Ha Noi",
            "humidity": 120.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let climate = MockClimateAccess::new();
    let test_app = spawn_app(Arc::new(climate)).await;

    let (status, _) = post_json(&test_app, "/predict", json!({"time": "6/30/2025 14:00"})).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn seeded_app_returns_identical_predictions() {
    let mut climate = MockClimateAccess::new();
    climate
        .expect_lookup()
        .times(2)
        .returning(|_| found(profile("Da Nang-Da Nang", 26.4, 79.8)));

    let test_app = spawn_app(Arc::new(climate)).await;
    let payload = json!({"time": "2025-08-10T21:00:00+07:00", "province": "Da Nang-Da Nang"});

    let (first_status, first) = post_json(&test_app, "/predict", payload.clone()).await;
    let (second_status, second) = post_json(&test_app, "/predict", payload).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(first["hour"], 21);
    assert_eq!(first["month"], 8);

    let prediction = &first["prediction"];
    let humidity = prediction["predicted_humidity"].as_f64().unwrap();
    assert!((74.8..=84.8).contains(&humidity));
    let change = prediction["temperature_change"].as_f64().unwrap();
    assert!(change.abs() <= 0.5 + 1e-9);
}
