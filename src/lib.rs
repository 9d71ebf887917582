/// n8n-entrypoint: container supervisor for an n8n server
///
/// Starts the server, forwards termination signals to it, waits for its REST
/// API, and keeps its stored workflows in sync with a directory of JSON
/// workflow definitions.

// Environment-driven configuration
pub mod config;

// n8n REST API client and readiness polling
pub mod api;

// Server child process, signal forwarding and CLI import
pub mod process;

// Directory scan, reconciliation and debounced watching
pub mod workflow;

// Orchestration of the pieces above
pub mod supervisor;

pub use config::Config;
pub use supervisor::{init_tracing, run};
