//! Application layer - Recovery use cases and port interfaces
//!
//! Contains the component recovery executor, the orchestrator, and the
//! trait definitions for collaborator interactions.

pub mod executor;
pub mod orchestrator;
pub mod ports;

// Re-export use cases
pub use executor::{ComponentSnapshot, ExecutorError, RecoveryExecutor};
pub use orchestrator::{RecoveryOrchestrator, RecoveryReport, StatusObserver};
