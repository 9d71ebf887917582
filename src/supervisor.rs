/// Supervisor setup and orchestration
///
/// Wires together the server process, signal forwarding and the workflow
/// import task, and decides the entrypoint's exit code.

use crate::{
    api::{wait_until_ready, RestClient},
    config::Config,
    process::{CliImporter, ServerProcess, SignalForwarder},
    workflow::{watch_directory, Reconciler},
};
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor the configured filter parses
const DEFAULT_LOG_FILTER: &str = "info";

/// Pick the first filter that parses: `RUST_LOG`, then the configured one, then `info`
fn log_filter(rust_log: Option<&str>, configured: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global `tracing` subscriber
pub fn init_tracing(config: &Config) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), &config.log_filter);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Run the server until it exits and return its exit code
///
/// Workflow import runs alongside the server. An error escaping the import
/// task ends the supervisor early with that error.
pub async fn run(config: Config) -> Result<i32> {
    // Handlers go in first so a signal racing the spawn is queued, not fatal
    let signals = SignalForwarder::install()?;
    let server = ServerProcess::spawn(&config.import.binary)?;

    // Detached: the forwarder lives until the process exits
    if let Some(pid) = server.id() {
        let _forwarder = signals.forward_to(pid);
    }

    let mut import_task = tokio::spawn(import_workflows(config));
    let exit = server.wait();
    tokio::pin!(exit);

    let code = tokio::select! {
        code = &mut exit => code?,
        joined = &mut import_task => {
            joined.context("Workflow import task panicked")??;
            exit.await?
        }
    };

    import_task.abort();
    Ok(code)
}

/// Wait for the REST API, reconcile the workflow directory, then keep watching it
pub async fn import_workflows(config: Config) -> Result<()> {
    let api = RestClient::new(&config)?;

    tracing::info!("⏳ Waiting for n8n HTTP API to become available at {}", api.base_url());
    let ready = wait_until_ready(&api, config.readiness.attempts, config.readiness.interval()).await;
    if !ready {
        tracing::warn!("⚠️ n8n not ready, skipping import");
        return Ok(());
    }

    let dir = config.import.workflow_dir;
    let reconciler = Reconciler::new(
        api,
        CliImporter::new(config.import.binary),
        config.import.create_mode,
    );

    let report = reconciler.reconcile_dir(&dir).await;
    tracing::info!("📊 Initial import: {}", report);

    if let Err(e) = watch_directory(&dir, config.watch.debounce(), &reconciler).await {
        tracing::warn!("⚠️ Watcher failed: {:#}", e);
    }

    Ok(())
}
