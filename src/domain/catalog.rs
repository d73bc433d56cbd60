//! Strategy catalog
//!
//! Pure decision logic mapping an observed failure to a remediation
//! strategy. Deterministic: the same inputs always produce the same
//! strategy, so selection is fully unit-testable without any collaborator.

use super::component::Component;
use super::error::ErrorKind;
use super::strategy::RecoveryStrategy;

/// Select the strategy for an error on a component.
///
/// Escalation comes first: after one failed attempt the whole component is
/// reset, after two the entire system is. Only a fresh failure consults the
/// per-error lookup table.
pub fn select_strategy(
    error: &ErrorKind,
    component: Component,
    previous_attempts: u32,
) -> RecoveryStrategy {
    if previous_attempts >= 2 {
        return RecoveryStrategy::FullSystemReset;
    }
    if previous_attempts == 1 {
        return RecoveryStrategy::ResetComponent(component);
    }

    match (error, component) {
        (ErrorKind::PermissionDenied(_), _) => RecoveryStrategy::RequestPermissions,
        (ErrorKind::AudioDeviceUnavailable, Component::AudioSystem)
        | (ErrorKind::CaptureFailed(_), Component::AudioSystem) => RecoveryStrategy::ResetAudio,
        (ErrorKind::TranscriptionFailed(_), Component::TranscriptionEngine)
        | (ErrorKind::ModelLoadFailed(_), Component::TranscriptionEngine) => {
            RecoveryStrategy::RestartTranscription
        }
        (ErrorKind::TextInsertionFailed(_), Component::TextInsertion) => {
            RecoveryStrategy::RetryTextInsertion
        }
        (ErrorKind::HotkeySystemError(_), Component::HotkeySystem) => {
            RecoveryStrategy::ResetComponent(Component::HotkeySystem)
        }
        (ErrorKind::ResourceExhausted(_), _) => RecoveryStrategy::GracefulDegradation,
        _ => RecoveryStrategy::UserGuided,
    }
}

/// Ordered fallbacks to suggest when a strategy fails validation.
///
/// Terminal strategies (user-guided, graceful degradation) have no
/// fallback; everything else eventually bottoms out at user guidance.
pub fn fallback_chain(strategy: &RecoveryStrategy) -> Vec<RecoveryStrategy> {
    match strategy {
        RecoveryStrategy::RequestPermissions => vec![RecoveryStrategy::UserGuided],
        RecoveryStrategy::ResetAudio => vec![
            RecoveryStrategy::ResetComponent(Component::AudioSystem),
            RecoveryStrategy::UserGuided,
        ],
        RecoveryStrategy::RestartTranscription => vec![
            RecoveryStrategy::ResetComponent(Component::TranscriptionEngine),
            RecoveryStrategy::UserGuided,
        ],
        RecoveryStrategy::RetryTextInsertion => vec![
            RecoveryStrategy::ResetComponent(Component::TextInsertion),
            RecoveryStrategy::UserGuided,
        ],
        RecoveryStrategy::ResetComponent(_) => vec![
            RecoveryStrategy::FullSystemReset,
            RecoveryStrategy::UserGuided,
        ],
        RecoveryStrategy::FullSystemReset => vec![RecoveryStrategy::UserGuided],
        RecoveryStrategy::UserGuided | RecoveryStrategy::GracefulDegradation => vec![],
    }
}

/// Strict compatibility check for a strategy against an error/component pair.
///
/// Used before a ledger-recommended strategy may override the table-driven
/// choice: a historically successful strategy for one component must never
/// be applied to another. The universal fallbacks are always applicable.
pub fn is_applicable(
    strategy: &RecoveryStrategy,
    error: &ErrorKind,
    component: Component,
) -> bool {
    match strategy {
        RecoveryStrategy::FullSystemReset
        | RecoveryStrategy::UserGuided
        | RecoveryStrategy::GracefulDegradation => true,
        RecoveryStrategy::RequestPermissions => {
            matches!(error, ErrorKind::PermissionDenied(_))
        }
        RecoveryStrategy::ResetAudio => component == Component::AudioSystem,
        RecoveryStrategy::RestartTranscription => component == Component::TranscriptionEngine,
        RecoveryStrategy::RetryTextInsertion => component == Component::TextInsertion,
        RecoveryStrategy::ResetComponent(target) => *target == component,
    }
}
