//! ScribeRecovery - failure detection and recovery orchestration
//!
//! This crate provides the recovery core for a voice dictation stack: it
//! classifies component failures, selects and executes a recovery strategy
//! under a timeout, rolls back failed attempts from pre-recovery
//! snapshots, and learns from historical outcomes to improve future
//! strategy choices.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Failure taxonomy, strategy catalog, outcome ledger,
//!   status and guidance value objects
//! - **Application**: The recovery executor and orchestrator, plus port
//!   interfaces (traits) for the collaborators they repair
//! - **Infrastructure**: Adapter implementations (tracing diagnostics,
//!   channel guidance, simulated collaborators)

pub mod application;
pub mod domain;
pub mod infrastructure;
