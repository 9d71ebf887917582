//! In-process stand-in for the n8n REST API

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
    routing::{get, put},
    Router,
};
use n8n_entrypoint::Config;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

/// One request as seen by the mock
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug)]
pub struct MockState {
    pub workflows: Vec<Value>,
    pub list_status: StatusCode,
    pub wrap_in_data: bool,
    pub requests: Vec<Recorded>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            workflows: Vec::new(),
            list_status: StatusCode::OK,
            wrap_in_data: false,
            requests: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockN8n {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl MockN8n {
    pub async fn start(workflows: Vec<Value>) -> Self {
        let state = Shared::default();
        state.lock().unwrap().workflows = workflows;

        let app = Router::new()
            .route("/rest/workflows", get(list_workflows).post(create_workflow))
            .route("/rest/workflows/{id}", put(update_workflow))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Entrypoint configuration pointing at this mock
    pub fn config(&self, extra: &[(&str, &str)]) -> Config {
        let mut vars: HashMap<String, String> = HashMap::from([
            ("N8N_HOST".to_string(), self.addr.ip().to_string()),
            ("N8N_PORT".to_string(), self.addr.port().to_string()),
            ("N8N_BASIC_AUTH_USER".to_string(), "user".to_string()),
            ("N8N_BASIC_AUTH_PASSWORD".to_string(), "pass".to_string()),
        ]);
        for (key, value) in extra {
            vars.insert(key.to_string(), value.to_string());
        }
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    /// Poll until `predicate` holds for the recorded requests
    pub async fn wait_for<F>(&self, predicate: F) -> bool
    where
        F: Fn(&[Recorded]) -> bool,
    {
        for _ in 0..100 {
            if predicate(&self.requests()) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        false
    }
}

fn record(state: &Shared, method: &'static str, path: String, headers: &HeaderMap, body: &str) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().requests.push(Recorded {
        method,
        path,
        authorization,
        body: serde_json::from_str(body).ok(),
    });
}

async fn list_workflows(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    record(&state, "GET", "/rest/workflows".to_string(), &headers, "");
    let state = state.lock().unwrap();
    if state.list_status != StatusCode::OK {
        return (state.list_status, Json(json!({ "message": "Unauthorized" })));
    }

    let listing = Value::Array(state.workflows.clone());
    let body = if state.wrap_in_data {
        json!({ "data": listing })
    } else {
        listing
    };
    (StatusCode::OK, Json(body))
}

async fn update_workflow(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    record(&state, "PUT", format!("/rest/workflows/{}", id), &headers, &body);
    let value = serde_json::from_str(&body).unwrap_or(Value::Null);
    (StatusCode::OK, Json(value))
}

async fn create_workflow(
    State(state): State<Shared>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    record(&state, "POST", "/rest/workflows".to_string(), &headers, &body);
    let mut value = serde_json::from_str(&body).unwrap_or_else(|_| json!({}));
    let mut state = state.lock().unwrap();
    let id = format!("created-{}", state.workflows.len() + 1);
    value["id"] = Value::String(id);
    state.workflows.push(value.clone());
    (StatusCode::OK, Json(json!({ "data": value })))
}
