/// Readiness polling for the n8n HTTP API

use crate::api::WorkflowApi;
use std::time::Duration;

/// Poll the listing endpoint until the server answers
///
/// 200 means ready. 401 also means ready: the server is up, it just rejects
/// our credentials, and the import will report that per file. Anything else
/// (other statuses, connection refused, timeouts) is retried after `interval`
/// until `attempts` probes have been made.
pub async fn wait_until_ready<A: WorkflowApi>(api: &A, attempts: u32, interval: Duration) -> bool {
    for attempt in 1..=attempts {
        match api.probe().await {
            Ok(200) => {
                tracing::info!("✅ n8n REST API ready after {} attempt(s)", attempt);
                return true;
            }
            Ok(401) => {
                tracing::warn!("🔐 REST returned 401; treating n8n as ready");
                return true;
            }
            Ok(status) => tracing::debug!("⏳ Readiness probe {} returned {}", attempt, status),
            Err(e) => tracing::debug!("⏳ Readiness probe {} failed: {}", attempt, e),
        }

        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    false
}
