//! Failure taxonomy
//!
//! Closed set of failure categories observed across the dictation stack,
//! with pure accessors for recoverability and severity. This layer has no
//! side effects and no failure modes of its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How serious a failure is, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Warning,
    Critical,
}

impl Severity {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure category observed somewhere in the application.
///
/// The set is closed: collaborators map their internal errors onto one of
/// these kinds before reporting. Detail payloads are free text intended for
/// diagnostics and guidance, never for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ErrorKind {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Audio device unavailable")]
    AudioDeviceUnavailable,

    #[error("Audio capture failed: {0}")]
    CaptureFailed(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Failed to load model: {0}")]
    ModelLoadFailed(String),

    #[error("Text insertion failed: {0}")]
    TextInsertionFailed(String),

    #[error("Hotkey conflict: {0}")]
    HotkeyConflict(String),

    #[error("Hotkey system error: {0}")]
    HotkeySystemError(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Component failure: {0}")]
    ComponentFailure(String),
}

impl ErrorKind {
    /// Whether automated recovery is worth attempting.
    ///
    /// Permission denials, hotkey conflicts and resource exhaustion require
    /// a human action the system cannot perform for itself; they bypass the
    /// automated pipeline and go straight to user guidance.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::PermissionDenied(_) | Self::HotkeyConflict(_) | Self::ResourceExhausted(_)
        )
    }

    /// Severity of this failure kind. Constant across calls.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::PermissionDenied(_) => Severity::Critical,
            Self::AudioDeviceUnavailable => Severity::Critical,
            Self::CaptureFailed(_) => Severity::Warning,
            Self::TranscriptionFailed(_) => Severity::Warning,
            Self::ModelLoadFailed(_) => Severity::Critical,
            Self::TextInsertionFailed(_) => Severity::Minor,
            Self::HotkeyConflict(_) => Severity::Warning,
            Self::HotkeySystemError(_) => Severity::Critical,
            Self::ResourceExhausted(_) => Severity::Critical,
            Self::ComponentFailure(_) => Severity::Warning,
        }
    }
}
