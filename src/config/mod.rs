/// Configuration management for the n8n entrypoint
///
/// Everything is read from environment variables so the same image can be
/// reconfigured per deployment without rebuilding.

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Directory the n8n image mounts workflow definitions into
pub const DEFAULT_WORKFLOW_DIR: &str = "/home/node/.n8n/workflows";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the n8n REST API listens
    pub server: ServerConfig,
    /// Basic auth credentials for the REST API
    pub auth: AuthConfig,
    /// Workflow import settings
    pub import: ImportConfig,
    /// Readiness polling settings
    pub readiness: ReadinessConfig,
    /// Directory watch settings
    pub watch: WatchConfig,
    /// `tracing` filter used when RUST_LOG is unset or invalid
    pub log_filter: String,
}

/// n8n HTTP server location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host the REST API is reached on (e.g., "127.0.0.1")
    pub host: String,
    /// Port number
    pub port: u16,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub user: String,
    pub password: String,
}

/// How workflows are created when the server does not know them yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateMode {
    /// `n8n import:workflow --input <file>`
    Cli,
    /// `POST /rest/workflows`, falling back to the CLI when rejected
    Rest,
}

impl CreateMode {
    /// Parse an env value; anything unrecognised means the CLI importer
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "rest" => CreateMode::Rest,
            _ => CreateMode::Cli,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Directory holding `*.json` workflow definitions
    pub workflow_dir: PathBuf,
    /// n8n executable, used both for the server and for CLI imports
    pub binary: String,
    pub create_mode: CreateMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Number of probes before giving up on the import
    pub attempts: u32,
    /// Delay between probes in milliseconds
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period a file must see before it is reconciled again
    pub debounce_ms: u64,
}

impl Config {
    /// Build configuration from an arbitrary variable lookup
    ///
    /// `Default` uses the process environment; tests pass a closure over a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Self {
            server: ServerConfig {
                host: text("N8N_HOST", "127.0.0.1"),
                port: lookup("N8N_PORT")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(5678),
                request_timeout_ms: number("N8N_REQUEST_TIMEOUT_MS", 5000),
            },
            auth: AuthConfig {
                user: text("N8N_BASIC_AUTH_USER", ""),
                password: text("N8N_BASIC_AUTH_PASSWORD", ""),
            },
            import: ImportConfig {
                workflow_dir: PathBuf::from(text("N8N_WORKFLOW_DIR", DEFAULT_WORKFLOW_DIR)),
                binary: text("N8N_BINARY", "n8n"),
                create_mode: CreateMode::parse(&text("N8N_IMPORT_MODE", "cli")),
            },
            readiness: ReadinessConfig {
                attempts: u32::try_from(number("N8N_READY_RETRIES", 120)).unwrap_or(u32::MAX),
                interval_ms: number("N8N_READY_INTERVAL_MS", 1000),
            },
            watch: WatchConfig {
                debounce_ms: number("N8N_WATCH_DEBOUNCE_MS", 500),
            },
            log_filter: text("N8N_LOG_LEVEL", "info"),
        }
    }
}

impl Default for Config {
    /// Configuration from the container environment
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl ServerConfig {
    /// Base URL of the REST API, without trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl ReadinessConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
