/// Workflow directory listing

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files renamed with this prefix have already been imported and are ignored
pub const IMPORTED_PREFIX: &str = ".imported_";

/// Suffix of workflow definition files
pub const WORKFLOW_SUFFIX: &str = ".json";

/// Whether a file name denotes a workflow definition still to be reconciled
pub fn is_workflow_file(name: &str) -> bool {
    name.ends_with(WORKFLOW_SUFFIX) && !name.starts_with(IMPORTED_PREFIX)
}

/// Workflow files directly inside `dir`, sorted by path
pub async fn list_workflow_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read workflow directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if name.to_str().is_some_and(is_workflow_file) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}
