/// Directory watch with per-file debouncing
///
/// Editors and `docker cp` tend to emit several events per save. Each path gets
/// its own deadline that is pushed back on every event; the file is reconciled
/// once its deadline passes without further events.

use crate::{
    api::WorkflowApi,
    process::WorkflowImporter,
    workflow::{reconcile::Reconciler, scan::is_workflow_file},
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::{sync::mpsc, time::Instant};

/// Pending paths and the instant each becomes due
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Record an event for `path`, restarting its window
    pub fn touch(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path, now + self.window);
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Remove and return every path whose deadline is at or before `now`
    pub fn take_due(&mut self, now: Instant) -> Vec<PathBuf> {
        let mut due: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &due {
            self.pending.remove(path);
        }

        due.sort();
        due
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Workflow files touched by a notify event
fn workflow_paths(event: Event) -> Vec<PathBuf> {
    if matches!(event.kind, EventKind::Access(_)) {
        return Vec::new();
    }

    event
        .paths
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_workflow_file)
        })
        .collect()
}

/// Watch `dir` and reconcile changed workflow files until the task is dropped
///
/// Only fails if the watcher cannot be set up.
pub async fn watch_directory<A, I>(
    dir: &Path,
    window: Duration,
    reconciler: &Reconciler<A, I>,
) -> Result<()>
where
    A: WorkflowApi,
    I: WorkflowImporter,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                for path in workflow_paths(event) {
                    let _ = tx.send(path);
                }
            }
            Err(e) => tracing::warn!("⚠️ Watch error: {}", e),
        },
        notify::Config::default(),
    )
    .context("Failed to create file watcher")?;

    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;

    tracing::info!("📁 File watcher established for {}", dir.display());

    let mut debouncer = Debouncer::new(window);
    loop {
        let deadline = debouncer.next_deadline();
        tokio::select! {
            received = rx.recv() => match received {
                Some(path) => {
                    tracing::debug!("📝 Change detected: {}", path.display());
                    debouncer.touch(path, Instant::now());
                }
                None => break,
            },
            _ = sleep_until(deadline) => {
                for path in debouncer.take_due(Instant::now()) {
                    let outcome = reconciler.reconcile_file(&path).await;
                    tracing::debug!("🔁 {}: {:?}", path.display(), outcome);
                }
            }
        }
    }

    drop(watcher);
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
