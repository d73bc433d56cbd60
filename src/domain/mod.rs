//! Domain layer - Core recovery logic
//!
//! Contains the failure taxonomy, strategy catalog, outcome ledger and the
//! value objects shared across the crate. This layer has no dependencies
//! on external systems.

pub mod catalog;
pub mod component;
pub mod config;
pub mod error;
pub mod guidance;
pub mod ledger;
pub mod status;
pub mod strategy;

// Re-export common types
pub use component::Component;
pub use config::RecoveryConfig;
pub use error::{ErrorKind, Severity};
pub use guidance::{guidance_for, Guidance};
pub use ledger::{ErrorRecord, ExecutionRecord, OutcomeLedger, MIN_PAIR_SAMPLES};
pub use status::{FailureReason, RecoveryStatus};
pub use strategy::RecoveryStrategy;
