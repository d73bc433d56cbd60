//! Recoverable subsystems
//!
//! The closed set of application subsystems that can fail and be recovered
//! independently. Components are stateless identifiers; the live state they
//! describe is owned by the collaborators behind the port interfaces.

use serde::{Deserialize, Serialize};

/// A logical subsystem of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    HotkeySystem,
    AudioSystem,
    TranscriptionEngine,
    TextInsertion,
    SystemResources,
}

impl Component {
    /// All components, in full-system-reset order.
    pub const ALL: [Component; 5] = [
        Self::HotkeySystem,
        Self::AudioSystem,
        Self::TranscriptionEngine,
        Self::TextInsertion,
        Self::SystemResources,
    ];

    /// Human-readable name for status displays
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::HotkeySystem => "Hotkey System",
            Self::AudioSystem => "Audio System",
            Self::TranscriptionEngine => "Transcription Engine",
            Self::TextInsertion => "Text Insertion",
            Self::SystemResources => "System Resources",
        }
    }

    /// Short description of what the component does
    pub const fn description(&self) -> &'static str {
        match self {
            Self::HotkeySystem => "Global hotkey listener that starts and stops dictation",
            Self::AudioSystem => "Microphone capture pipeline",
            Self::TranscriptionEngine => "Speech-to-text engine and its loaded model",
            Self::TextInsertion => "Mechanism that types transcribed text into the focused app",
            Self::SystemResources => "Memory, CPU and other shared machine resources",
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
