/// Child process management: the n8n server itself and CLI imports

pub mod child;
pub mod import;

pub use child::{forward_signals, ServerProcess, SignalForwarder};
pub use import::{CliImporter, WorkflowImporter};
