//! Recovery strategies
//!
//! Value types describing the remediation actions the executor knows how to
//! perform. Attributes are static: a strategy carries no mutable state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::component::Component;

/// A concrete remediation procedure.
///
/// Equality and hashing compare both the tag and, for
/// [`RecoveryStrategy::ResetComponent`], the target component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecoveryStrategy {
    /// Re-request capture permission and re-check accessibility access
    RequestPermissions,
    /// Stop, settle, and resume the audio capture pipeline
    ResetAudio,
    /// Clear transcription state and reload the model if needed
    RestartTranscription,
    /// Re-check text insertion availability after a short settle
    RetryTextInsertion,
    /// Generic stop/settle/start reset of one component
    ResetComponent(Component),
    /// Reset every component in fixed order; coarse last resort
    FullSystemReset,
    /// Surface instructions; the user performs the fix manually
    UserGuided,
    /// Accept reduced functionality instead of attempting repair
    GracefulDegradation,
}

impl RecoveryStrategy {
    /// Whether the system can perform this strategy without a human.
    pub const fn can_automate(&self) -> bool {
        !matches!(self, Self::UserGuided)
    }

    /// Selection priority; higher is preferred when success rates tie.
    pub const fn priority(&self) -> u8 {
        match self {
            Self::RequestPermissions => 90,
            Self::ResetAudio => 85,
            Self::RestartTranscription => 80,
            Self::RetryTextInsertion => 75,
            Self::ResetComponent(_) => 60,
            Self::FullSystemReset => 30,
            Self::UserGuided => 20,
            Self::GracefulDegradation => 10,
        }
    }

    /// Rough expected wall-clock cost, used for progress hints and logging.
    pub const fn estimated_duration(&self) -> Duration {
        match self {
            Self::RequestPermissions => Duration::from_secs(10),
            Self::ResetAudio => Duration::from_secs(2),
            Self::RestartTranscription => Duration::from_secs(5),
            Self::RetryTextInsertion => Duration::from_secs(1),
            Self::ResetComponent(_) => Duration::from_secs(3),
            Self::FullSystemReset => Duration::from_secs(15),
            Self::UserGuided => Duration::from_secs(60),
            Self::GracefulDegradation => Duration::ZERO,
        }
    }

    /// Whether the strategy blocks on a user interaction (e.g. an OS prompt).
    pub const fn requires_user_interaction(&self) -> bool {
        matches!(self, Self::RequestPermissions | Self::UserGuided)
    }

    /// Human-readable description for guidance and logs
    pub const fn description(&self) -> &'static str {
        match self {
            Self::RequestPermissions => "Re-request the required system permissions",
            Self::ResetAudio => "Restart the audio capture pipeline",
            Self::RestartTranscription => "Restart the transcription engine",
            Self::RetryTextInsertion => "Retry inserting text into the focused application",
            Self::ResetComponent(Component::HotkeySystem) => "Reset the hotkey listener",
            Self::ResetComponent(Component::AudioSystem) => "Reset the audio system",
            Self::ResetComponent(Component::TranscriptionEngine) => {
                "Reset the transcription engine"
            }
            Self::ResetComponent(Component::TextInsertion) => "Reset text insertion",
            Self::ResetComponent(Component::SystemResources) => "Release system resources",
            Self::FullSystemReset => "Reset all dictation components",
            Self::UserGuided => "Follow the recovery instructions manually",
            Self::GracefulDegradation => "Continue with reduced functionality",
        }
    }
}

impl std::fmt::Display for RecoveryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
