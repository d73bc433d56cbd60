//! Orchestrator status
//!
//! The only mutable state the core exposes to the outside. Observers see
//! each transition exactly once, in order.

use serde::{Deserialize, Serialize};

use super::component::Component;

/// Why an automated recovery did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The error kind requires a human action
    Unrecoverable,
    /// Too many recent attempts for this component
    AttemptsExhausted,
    /// The recovery action exceeded the orchestrator timeout
    Timeout,
    /// The strategy threw or failed validation
    StrategyFailed(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecoverable => write!(f, "error is not automatically recoverable"),
            Self::AttemptsExhausted => write!(f, "too many recent recovery attempts"),
            Self::Timeout => write!(f, "recovery timed out"),
            Self::StrategyFailed(detail) => write!(f, "recovery strategy failed: {detail}"),
        }
    }
}

/// Live recovery state.
///
/// `idle -> detecting -> recovering -> completed | failed -> idle`, with
/// the return to idle happening after a quiescence delay unless a new
/// error interrupts it first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecoveryStatus {
    Idle,
    Detecting,
    Recovering { component: Component, progress: f32 },
    Completed { success: bool },
    Failed { reason: FailureReason },
}

impl RecoveryStatus {
    /// Whether a recovery operation is currently in flight
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Detecting | Self::Recovering { .. })
    }
}

impl std::fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Detecting => write!(f, "detecting"),
            Self::Recovering {
                component,
                progress,
            } => write!(f, "recovering {} ({:.0}%)", component, progress * 100.0),
            Self::Completed { success: true } => write!(f, "completed"),
            Self::Completed { success: false } => write!(f, "completed (unsuccessful)"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_states() {
        assert!(!RecoveryStatus::Idle.is_active());
        assert!(RecoveryStatus::Detecting.is_active());
        assert!(RecoveryStatus::Recovering {
            component: Component::AudioSystem,
            progress: 0.0
        }
        .is_active());
        assert!(!RecoveryStatus::Completed { success: true }.is_active());
        assert!(!RecoveryStatus::Failed {
            reason: FailureReason::Timeout
        }
        .is_active());
    }

    #[test]
    fn display_formats() {
        let status = RecoveryStatus::Recovering {
            component: Component::AudioSystem,
            progress: 0.5,
        };
        assert_eq!(status.to_string(), "recovering Audio System (50%)");
        assert_eq!(
            RecoveryStatus::Failed {
                reason: FailureReason::Timeout
            }
            .to_string(),
            "failed: recovery timed out"
        );
    }

    #[test]
    fn status_serializes_for_observers() {
        let status = RecoveryStatus::Completed { success: true };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("Completed"));
    }
}
