/// CLI-based workflow import (`n8n import:workflow --input <file>`)

use std::{future::Future, path::Path, process::Stdio};
use tokio::process::Command;

/// Creates a workflow on the server from a definition file
pub trait WorkflowImporter: Send + Sync {
    /// Returns `true` when the import succeeded
    fn import(&self, path: &Path) -> impl Future<Output = bool> + Send;
}

/// Runs the n8n binary's import subcommand with inherited stdio
#[derive(Debug, Clone)]
pub struct CliImporter {
    binary: String,
}

impl CliImporter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl WorkflowImporter for CliImporter {
    async fn import(&self, path: &Path) -> bool {
        tracing::info!("📥 Importing via CLI: {}", path.display());

        let status = Command::new(&self.binary)
            .arg("import:workflow")
            .arg("--input")
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::warn!(
                    "⚠️ {} import returned non-zero status for {}: {:?}",
                    self.binary,
                    path.display(),
                    status.code()
                );
                false
            }
            Err(e) => {
                tracing::error!("❌ Error importing {}: {}", path.display(), e);
                false
            }
        }
    }
}
