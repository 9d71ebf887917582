/// Reconciliation of workflow files against the server's stored workflows
///
/// For each file:
/// 1. A named workflow that the server already lists is replaced via `PUT`.
/// 2. Otherwise it is created: via `POST` in REST mode, else (or when that is
///    rejected) with `n8n import:workflow`.
///
/// Errors never abort a pass; they are logged and the file moves on to the
/// next fallback or is skipped.

use crate::{
    api::WorkflowApi,
    config::CreateMode,
    process::WorkflowImporter,
    workflow::{
        scan::list_workflow_files,
        types::{find_by_name, parse_listing, ReconcileOutcome, ReconcileReport},
    },
};
use serde_json::Value;
use std::path::Path;

/// Drives one file or one directory pass through the API and importer
#[derive(Debug)]
pub struct Reconciler<A, I> {
    api: A,
    importer: I,
    mode: CreateMode,
}

impl<A: WorkflowApi, I: WorkflowImporter> Reconciler<A, I> {
    pub fn new(api: A, importer: I, mode: CreateMode) -> Self {
        Self { api, importer, mode }
    }

    /// Reconcile every workflow file in `dir`, in name order
    pub async fn reconcile_dir(&self, dir: &Path) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let files = match list_workflow_files(dir).await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("❌ Error scanning workflows dir: {:#}", e);
                return report;
            }
        };

        for file in files {
            let outcome = self.reconcile_file(&file).await;
            report.record(&outcome);
        }

        report
    }

    /// Bring the server in line with a single definition file
    pub async fn reconcile_file(&self, path: &Path) -> ReconcileOutcome {
        tracing::info!("📋 Processing workflow file: {}", path.display());

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("⚠️ Could not read {}: {}", path.display(), e);
                return ReconcileOutcome::Skipped { reason: e.to_string() };
            }
        };

        // Unparsable files still go to the CLI so n8n reports the problem itself
        let document: Option<Value> = serde_json::from_str(&content).ok();
        let named = document.as_ref().and_then(|doc| {
            let name = doc.get("name").and_then(Value::as_str)?;
            (!name.is_empty()).then(|| (doc, name))
        });

        if let Some((doc, name)) = named {
            if let Some(outcome) = self.try_update(doc, name).await {
                return outcome;
            }
            if self.mode == CreateMode::Rest {
                if let Some(outcome) = self.try_create(doc, name).await {
                    return outcome;
                }
            }
        }

        if self.importer.import(path).await {
            ReconcileOutcome::Imported
        } else {
            tracing::warn!("⚠️ Import failed for {}", path.display());
            ReconcileOutcome::Failed {
                reason: format!("CLI import failed for {}", path.display()),
            }
        }
    }

    /// `PUT` over an existing workflow of the same name, if there is one
    async fn try_update(&self, doc: &Value, name: &str) -> Option<ReconcileOutcome> {
        let listing = match self.api.list_workflows().await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::debug!("Listing workflows failed, falling back: {}", e);
                return None;
            }
        };

        if listing.status != 200 {
            tracing::debug!("Listing workflows returned {}, falling back", listing.status);
            return None;
        }

        let workflows = listing.json.as_ref().and_then(parse_listing)?;
        let id = find_by_name(&workflows, name)?.id.clone()?;

        let mut payload = doc.clone();
        if let Value::Object(map) = &mut payload {
            map.insert("id".to_string(), Value::String(id.clone()));
        }

        match self.api.update_workflow(&id, &payload).await {
            Ok(response) if response.is_success() => {
                tracing::info!("✅ Updated existing workflow via REST PUT: {} ({})", name, id);
                Some(ReconcileOutcome::Updated { id })
            }
            Ok(response) => {
                tracing::warn!("⚠️ REST PUT did not succeed for {}: {}", name, response.status);
                None
            }
            Err(e) => {
                tracing::warn!("⚠️ REST PUT error for {}: {}", name, e);
                None
            }
        }
    }

    async fn try_create(&self, doc: &Value, name: &str) -> Option<ReconcileOutcome> {
        match self.api.create_workflow(doc).await {
            Ok(response) if response.is_success() => {
                let id = response.workflow_id();
                tracing::info!("✅ Created workflow via REST POST: {} ({:?})", name, id);
                Some(ReconcileOutcome::Created { id })
            }
            Ok(response) => {
                tracing::warn!("⚠️ REST POST did not succeed for {}: {}", name, response.status);
                None
            }
            Err(e) => {
                tracing::warn!("⚠️ REST POST error for {}: {}", name, e);
                None
            }
        }
    }
}
