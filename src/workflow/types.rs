/// Workflow-side data passed between the REST API and reconciliation
///
/// Workflow definitions themselves are never modelled: they stay as
/// `serde_json::Value` and reach the server unchanged apart from `id`.

use serde_json::Value;
use std::fmt;

/// One entry of the `GET /rest/workflows` listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSummary {
    /// Server-assigned id; older n8n versions use numbers, newer ones strings
    pub id: Option<String>,
    pub name: Option<String>,
}

impl WorkflowSummary {
    fn from_value(value: &Value) -> Self {
        Self {
            id: value.get("id").and_then(id_to_string),
            name: value.get("name").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Render a JSON id (string or number) as a path segment
pub fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a listing body: a bare array, or an object wrapping it under `data`
pub fn parse_listing(body: &Value) -> Option<Vec<WorkflowSummary>> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(map) => map.get("data")?.as_array()?,
        _ => return None,
    };
    Some(entries.iter().map(WorkflowSummary::from_value).collect())
}

/// First listed workflow with this name that has an id we can update
pub fn find_by_name<'a>(workflows: &'a [WorkflowSummary], name: &str) -> Option<&'a WorkflowSummary> {
    workflows
        .iter()
        .find(|w| w.name.as_deref() == Some(name) && w.id.is_some())
}

/// Result of reconciling one workflow file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Existing workflow replaced via `PUT`
    Updated { id: String },
    /// New workflow created via `POST`
    Created { id: Option<String> },
    /// Handed to `n8n import:workflow`, which exited successfully
    Imported,
    /// CLI import failed
    Failed { reason: String },
    /// File could not be read
    Skipped { reason: String },
}

/// Tally of one directory pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub updated: usize,
    pub created: usize,
    pub imported: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ReconcileReport {
    pub fn record(&mut self, outcome: &ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Updated { .. } => self.updated += 1,
            ReconcileOutcome::Created { .. } => self.created += 1,
            ReconcileOutcome::Imported => self.imported += 1,
            ReconcileOutcome::Failed { .. } => self.failed += 1,
            ReconcileOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.updated + self.created + self.imported + self.failed + self.skipped
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s): {} updated, {} created, {} imported, {} failed, {} skipped",
            self.total(),
            self.updated,
            self.created,
            self.imported,
            self.failed,
            self.skipped
        )
    }
}
