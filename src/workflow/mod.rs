/// Workflow Synchronisation Layer
///
/// Keeps the server's stored workflows in line with the definition files in
/// the workflow directory:
/// - Directory scanning and the "already imported" naming marker
/// - Per-file reconciliation (REST update, REST or CLI create)
/// - Debounced directory watching

pub mod types;

pub mod scan;

pub mod reconcile;

pub mod watcher;

pub use reconcile::Reconciler;
pub use types::{ReconcileOutcome, ReconcileReport, WorkflowSummary};
pub use watcher::watch_directory;
