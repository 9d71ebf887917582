/// n8n REST API access
///
/// `WorkflowApi` is the seam reconciliation talks through; `RestClient` is the
/// reqwest implementation used in production.

pub mod client;
pub mod readiness;

use anyhow::Result;
use serde_json::Value;
use std::future::Future;

pub use client::RestClient;
pub use readiness::wait_until_ready;

/// Status and (if the body was JSON) parsed body of a REST call
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub json: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `id` of a created/updated workflow, either top-level or under `data`
    pub fn workflow_id(&self) -> Option<String> {
        let json = self.json.as_ref()?;
        let id = json
            .get("id")
            .or_else(|| json.get("data").and_then(|data| data.get("id")))?;
        crate::workflow::types::id_to_string(id)
    }
}

/// Workflow endpoints of the n8n REST API
pub trait WorkflowApi: Send + Sync {
    /// `GET /rest/workflows`
    fn list_workflows(&self) -> impl Future<Output = Result<ApiResponse>> + Send;

    /// `PUT /rest/workflows/{id}`
    fn update_workflow(
        &self,
        id: &str,
        workflow: &Value,
    ) -> impl Future<Output = Result<ApiResponse>> + Send;

    /// `POST /rest/workflows`
    fn create_workflow(&self, workflow: &Value) -> impl Future<Output = Result<ApiResponse>> + Send;

    /// Status code of the listing endpoint, used for readiness checks
    fn probe(&self) -> impl Future<Output = Result<u16>> + Send {
        async move {
            let response = self.list_workflows().await?;
            Ok(response.status)
        }
    }
}
