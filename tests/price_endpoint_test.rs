use axum_test::TestServer;
use crop_prices::{create_router, AppState, PricesResponse, TomlConfig};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

const RESOURCE_PATH: &str = "/resource/9ef84268-d588-465a-a308-a864a43d0070";

fn test_app(endpoint: &str, timeout_seconds: u64) -> TestServer {
    let config = TomlConfig::from_toml_str(&format!(
        r#"
[upstream]
endpoint = "{}"
api_key = "test-key"
timeout_seconds = {}
"#,
        endpoint, timeout_seconds
    ))
    .unwrap();

    let state = AppState::from_config(&config).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

fn fallback_body() -> serde_json::Value {
    json!({
        "records": [
            {"crop": "Tomato", "price": 3200},
            {"crop": "Onion", "price": 2500},
            {"crop": "Potato", "price": 2000},
            {"crop": "Wheat", "price": 2800},
            {"crop": "Rice", "price": 3500}
        ]
    })
}

async fn assert_fallback_served(app: &TestServer) {
    let response = app.get("/api/prices").await;

    response.assert_status_ok();
    assert_eq!(response.header("x-price-source"), "fallback");
    response.assert_json(&fallback_body());
}

#[tokio::test]
async fn test_end_to_end_live_prices() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(RESOURCE_PATH)
                .query_param("api-key", "test-key")
                .query_param("format", "json")
                .query_param("limit", "20");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "records": [
                        {"commodity": "Tomato", "modal_price": "3400"},
                        {"commodity": "  ", "modal_price": "-5"}
                    ]
                }));
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 5);
    let response = app.get("/api/prices").await;

    api_mock.assert_async().await;
    response.assert_status_ok();
    assert_eq!(response.header("x-price-source"), "live");
    assert_eq!(response.header("cache-control"), "no-store");
    response.assert_json(&json!({"records": [{"crop": "Tomato", "price": 3400}]}));
}

#[tokio::test]
async fn test_network_fault_serves_exact_fallback() {
    // 沒有任何服務監聽的埠
    let app = test_app("http://127.0.0.1:1/resource", 2);
    assert_fallback_served(&app).await;
}

#[tokio::test]
async fn test_server_error_serves_fallback() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(RESOURCE_PATH);
            then.status(500);
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 5);
    assert_fallback_served(&app).await;

    // 不重試
    api_mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_timeout_serves_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RESOURCE_PATH);
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"records": [{"commodity": "Tomato", "modal_price": "3400"}]}));
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 1);
    assert_fallback_served(&app).await;
}

#[tokio::test]
async fn test_empty_body_serves_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RESOURCE_PATH);
            then.status(200);
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 5);
    assert_fallback_served(&app).await;
}

#[tokio::test]
async fn test_malformed_json_serves_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RESOURCE_PATH);
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"records": [{"commodity": "Tomato""#);
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 5);
    assert_fallback_served(&app).await;
}

#[tokio::test]
async fn test_missing_or_wrong_typed_records_field_serves_fallback() {
    let payloads = vec![
        json!({"message": "Invalid API key"}),
        json!({"records": "none"}),
        json!({"records": {"commodity": "Tomato", "modal_price": "3400"}}),
        json!([{"commodity": "Tomato", "modal_price": "3400"}]),
    ];

    for payload in payloads {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(RESOURCE_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(payload.clone());
            })
            .await;

        let app = test_app(&server.url(RESOURCE_PATH), 5);
        assert_fallback_served(&app).await;
    }
}

#[tokio::test]
async fn test_all_invalid_records_serve_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RESOURCE_PATH);
            then.status(200).json_body(json!({
                "records": [
                    {"commodity": "Garlic", "modal_price": "abc"},
                    {"commodity": "Chilli", "modal_price": "0"},
                    {"commodity": "Maize"}
                ]
            }));
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 5);
    assert_fallback_served(&app).await;
}

#[tokio::test]
async fn test_empty_records_array_serves_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RESOURCE_PATH);
            then.status(200).json_body(json!({"records": []}));
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 5);
    assert_fallback_served(&app).await;
}

#[tokio::test]
async fn test_live_records_are_positive_trimmed_and_defaulted() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RESOURCE_PATH);
            then.status(200).json_body(json!({
                "records": [
                    {"commodity": "  Tomato  ", "modal_price": "3400"},
                    {"modal_price": "1500"},
                    {"commodity": "Garlic", "modal_price": "abc"},
                    {"commodity": "Onion", "modal_price": 2450.5},
                    {"commodity": "Potato", "modal_price": "0"}
                ]
            }));
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 5);
    let response = app.get("/api/prices").await;
    response.assert_status_ok();

    let body: PricesResponse = response.json();
    assert!(body.records.iter().all(|record| record.price > 0.0));

    let crops: Vec<&str> = body.records.iter().map(|r| r.crop.as_str()).collect();
    assert_eq!(crops, vec!["Tomato", "Unknown", "Onion"]);
    assert_eq!(body.records[2].price, 2450.5);
}

#[tokio::test]
async fn test_health_does_not_call_upstream() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(RESOURCE_PATH);
            then.status(200).json_body(json!({"records": []}));
        })
        .await;

    let app = test_app(&server.url(RESOURCE_PATH), 5);
    let response = app.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].as_i64().unwrap() >= 0);
    api_mock.assert_hits_async(0).await;
}
