/// reqwest-backed client for the n8n REST API
///
/// Every request carries basic auth from the environment and a JSON content
/// type. Response bodies are parsed as JSON when possible and kept as `None`
/// otherwise, so callers can still act on the status code.

use crate::{
    api::{ApiResponse, WorkflowApi},
    config::Config,
};
use anyhow::{Context, Result};
use reqwest::{header::CONTENT_TYPE, Method, RequestBuilder};
use serde_json::Value;

const WORKFLOWS_PATH: &str = "/rest/workflows";

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl RestClient {
    /// Create a client for the server described by `config`
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.server.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.server.base_url(),
            user: config.auth.user.clone(),
            password: config.auth.password.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .basic_auth(&self.user, Some(&self.password))
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("HTTP request failed: {}", e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read response body: {}", e))?;

        tracing::debug!("📡 Response status: {}", status);

        Ok(ApiResponse {
            status,
            json: serde_json::from_str(&text).ok(),
        })
    }
}

impl WorkflowApi for RestClient {
    async fn list_workflows(&self) -> Result<ApiResponse> {
        self.send(self.request(Method::GET, WORKFLOWS_PATH)).await
    }

    async fn update_workflow(&self, id: &str, workflow: &Value) -> Result<ApiResponse> {
        let path = format!("{}/{}", WORKFLOWS_PATH, id);
        tracing::debug!("🌍 HTTP Request: PUT {}", path);
        self.send(self.request(Method::PUT, &path).json(workflow)).await
    }

    async fn create_workflow(&self, workflow: &Value) -> Result<ApiResponse> {
        tracing::debug!("🌍 HTTP Request: POST {}", WORKFLOWS_PATH);
        self.send(self.request(Method::POST, WORKFLOWS_PATH).json(workflow))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_comes_from_server_config() {
        let config = Config::from_lookup(|key| match key {
            "N8N_HOST" => Some("n8n".to_string()),
            "N8N_PORT" => Some("5679".to_string()),
            _ => None,
        });
        let client = RestClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://n8n:5679");
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        // Port 9 (discard) is not expected to have an HTTP listener
        let config = Config::from_lookup(|key| match key {
            "N8N_PORT" => Some("9".to_string()),
            "N8N_REQUEST_TIMEOUT_MS" => Some("500".to_string()),
            _ => None,
        });
        let client = RestClient::new(&config).unwrap();
        assert!(client.list_workflows().await.is_err());
    }

    #[test]
    fn response_id_is_read_from_data_envelope() {
        let response = ApiResponse {
            status: 200,
            json: Some(serde_json::json!({ "data": { "id": "abc" } })),
        };
        assert!(response.is_success());
        assert_eq!(response.workflow_id().as_deref(), Some("abc"));
    }
}
