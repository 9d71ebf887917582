mod common;

use axum::http::StatusCode;
use common::MockN8n;
use n8n_entrypoint::api::{wait_until_ready, RestClient, WorkflowApi};
use serde_json::json;
use std::time::Duration;

// base64("user:pass")
const EXPECTED_AUTH: &str = "Basic dXNlcjpwYXNz";

#[tokio::test]
async fn listing_uses_basic_auth_from_config() {
    let mock = MockN8n::start(vec![json!({ "id": "1", "name": "Orders" })]).await;
    let client = RestClient::new(&mock.config(&[])).unwrap();

    let response = client.list_workflows().await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.json, Some(json!([{ "id": "1", "name": "Orders" }])));
    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some(EXPECTED_AUTH));
}

#[tokio::test]
async fn update_puts_payload_to_workflow_path() {
    let mock = MockN8n::start(vec![]).await;
    let client = RestClient::new(&mock.config(&[])).unwrap();
    let payload = json!({ "id": "42", "name": "Orders", "nodes": [] });

    let response = client.update_workflow("42", &payload).await.unwrap();

    assert!(response.is_success());
    assert_eq!(mock.request_lines(), vec!["PUT /rest/workflows/42"]);
    assert_eq!(mock.requests()[0].body, Some(payload));
}

#[tokio::test]
async fn create_returns_server_assigned_id() {
    let mock = MockN8n::start(vec![]).await;
    let client = RestClient::new(&mock.config(&[])).unwrap();

    let response = client.create_workflow(&json!({ "name": "Fresh" })).await.unwrap();

    assert!(response.is_success());
    assert_eq!(response.workflow_id().as_deref(), Some("created-1"));
}

#[tokio::test]
async fn unauthorized_server_is_still_ready() {
    let mock = MockN8n::start(vec![]).await;
    mock.state.lock().unwrap().list_status = StatusCode::UNAUTHORIZED;
    let client = RestClient::new(&mock.config(&[])).unwrap();

    assert_eq!(client.probe().await.unwrap(), 401);
    assert!(wait_until_ready(&client, 3, Duration::from_millis(10)).await);
}

#[tokio::test]
async fn server_errors_exhaust_readiness_attempts() {
    let mock = MockN8n::start(vec![]).await;
    mock.state.lock().unwrap().list_status = StatusCode::SERVICE_UNAVAILABLE;
    let client = RestClient::new(&mock.config(&[])).unwrap();

    assert!(!wait_until_ready(&client, 3, Duration::from_millis(10)).await);
    assert_eq!(mock.requests().len(), 3);
}
