mod common;

use common::TestApp;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn(None).await;

    let response = app
        .client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "sandbox");
    assert_eq!(body["service"], "relay-service");
}

#[tokio::test]
async fn health_check_works_without_keys() {
    let app = TestApp::spawn_without_keys(None).await;

    let response = app
        .client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn api_root_reports_running() {
    let app = TestApp::spawn(None).await;

    let response = app
        .client
        .get(format!("{}/api", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "EduPay API Running");
}

#[tokio::test]
async fn metrics_endpoint_is_text() {
    let app = TestApp::spawn(None).await;

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_key_reports_missing_keys() {
    let app = TestApp::spawn_without_keys(None).await;

    let body: serde_json::Value = app
        .client
        .get(format!("{}/api/test-key", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["serverKeyUsed"], "NONE");
}

#[tokio::test]
async fn test_key_succeeds_with_accepted_key() {
    let snap = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/snap/v1/transactions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "probe-token",
            "redirect_url": "https://app.sandbox.midtrans.com/snap/v4/redirection/probe-token"
        })))
        .expect(1)
        .mount(&snap)
        .await;

    let app = TestApp::spawn(Some(snap.uri())).await;
    let body: serde_json::Value = app
        .client
        .get(format!("{}/api/test-key", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["token"], "probe-token");

    let requests = snap.received_requests().await.unwrap();
    let sent: serde_json::Value = requests[0].body_json().unwrap();
    assert!(sent["transaction_details"]["order_id"]
        .as_str()
        .unwrap()
        .starts_with("TEST-"));
    assert_eq!(sent["transaction_details"]["gross_amount"], 10000);
}

#[tokio::test]
async fn test_key_masks_rejected_key() {
    let snap = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/snap/v1/transactions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error_messages": ["Access denied due to unauthorized transaction, please check client or server key"]
        })))
        .mount(&snap)
        .await;

    let app = TestApp::spawn(Some(snap.uri())).await;
    let body: serde_json::Value = app
        .client
        .get(format!("{}/api/test-key", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["serverKeyUsed"], "SB-Mid-server-TEST12...");
    assert!(body["message"].as_str().unwrap().contains("Access denied"));
}
