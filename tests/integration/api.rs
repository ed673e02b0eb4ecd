//! End-to-end HTTP tests: real listener, real CSV file, real webhook
//! receiver.

use axum::{http::StatusCode, routing::post, Router};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use storefront::leads::{CsvLeadSink, LeadRecorder, WebhookLeadSink};
use storefront::server::{build_router, ServerState};

fn temp_csv() -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("storefront_it_{}", uuid::Uuid::new_v4()));
    p.push("leads.csv");
    p
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A webhook receiver that always answers with `status`.
async fn spawn_hook(status: StatusCode) -> String {
    let app = Router::new().route("/hook", post(move || async move { status }));
    format!("{}/hook", spawn(app).await)
}

async fn spawn_api(csv: &Path, webhook: Option<String>) -> String {
    let mut recorder = LeadRecorder::new(Arc::new(CsvLeadSink::new(csv)));
    if let Some(url) = webhook {
        recorder = recorder
            .with_forwarder(Arc::new(WebhookLeadSink::new(url, Duration::from_secs(2)).unwrap()));
    }
    let state = Arc::new(ServerState::new("Integration API", recorder));
    spawn(build_router(state)).await
}

fn lead_body() -> Value {
    json!({
        "name": "Jordan",
        "phone": "555-0142",
        "zip": "60601",
        "project": "Basement",
        "details": "finish + egress window"
    })
}

#[tokio::test]
async fn test_simulate_over_http() {
    let csv = temp_csv();
    let base = spawn_api(&csv, None).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/simulate"))
        .json(&json!({ "orderAmount": 100, "supplierCost": "50", "email": "shop@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"]["profit"].as_f64(), Some(50.0));
    assert_eq!(body["result"]["margin"].as_f64(), Some(50.0));
    assert_eq!(body["result"]["holdDays"], 1);

    let resp = client
        .post(format!("{base}/api/simulate"))
        .json(&json!({ "orderAmount": 0, "supplierCost": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid amounts: must be positive numbers");

    let resp = client
        .post(format!("{base}/api/simulate"))
        .json(&json!({ "supplierCost": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields: orderAmount, supplierCost");
}

#[tokio::test]
async fn test_lead_written_and_forwarded() {
    let csv = temp_csv();
    let hook = spawn_hook(StatusCode::OK).await;
    let base = spawn_api(&csv, Some(hook)).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/leads"))
        .json(&lead_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["lead"]["details"], "(provided)");

    let contents = std::fs::read_to_string(&csv).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines[0], "Timestamp,Name,Phone,ZIP,Project,Details");
    assert!(lines[1].contains("Jordan"));
    assert!(lines[1].ends_with("finish + egress window"));

    std::fs::remove_dir_all(csv.parent().unwrap()).unwrap();
}

#[tokio::test]
async fn test_webhook_failure_does_not_fail_request() {
    let csv = temp_csv();
    let hook = spawn_hook(StatusCode::SERVICE_UNAVAILABLE).await;
    let base = spawn_api(&csv, Some(hook)).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/leads"))
        .json(&lead_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(std::fs::read_to_string(&csv).unwrap().contains("Jordan"));

    std::fs::remove_dir_all(csv.parent().unwrap()).unwrap();
}

#[tokio::test]
async fn test_csv_failure_is_500() {
    // Pointing the CSV sink at a directory makes every append fail.
    let dir = std::env::temp_dir();
    let base = spawn_api(&dir, None).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/leads"))
        .json(&lead_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Failed to process lead");
    assert!(body["details"].is_string());
}
