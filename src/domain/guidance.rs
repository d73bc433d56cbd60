//! User guidance
//!
//! Structured instructions surfaced when automated recovery is impossible
//! or has failed. The table is total over the error taxonomy; the
//! orchestrator may append follow-up actions from the fallback chain.

use serde::{Deserialize, Serialize};

use super::component::Component;
use super::error::ErrorKind;

/// Structured recovery instructions for the user-facing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidance {
    pub title: String,
    pub message: String,
    pub actions: Vec<String>,
    pub help_url: Option<String>,
}

/// Build guidance for an error on a component.
pub fn guidance_for(error: &ErrorKind, component: Component) -> Guidance {
    match error {
        ErrorKind::PermissionDenied(permission) => Guidance {
            title: "Permission Required".to_string(),
            message: format!(
                "Dictation needs the {permission} permission, which is currently denied."
            ),
            actions: vec![
                format!("Open system settings and grant the {permission} permission"),
                "Restart dictation after granting access".to_string(),
            ],
            help_url: Some("https://support.example.com/permissions".to_string()),
        },
        ErrorKind::AudioDeviceUnavailable => Guidance {
            title: "Microphone Unavailable".to_string(),
            message: "No usable audio input device was found.".to_string(),
            actions: vec![
                "Check that a microphone is connected and selected as input".to_string(),
                "Close other applications that may hold the device exclusively".to_string(),
            ],
            help_url: Some("https://support.example.com/audio-devices".to_string()),
        },
        ErrorKind::CaptureFailed(detail) => Guidance {
            title: "Audio Capture Failed".to_string(),
            message: format!("Recording stopped unexpectedly: {detail}"),
            actions: vec![
                "Try recording again".to_string(),
                "Switch to a different input device if the problem persists".to_string(),
            ],
            help_url: None,
        },
        ErrorKind::TranscriptionFailed(detail) => Guidance {
            title: "Transcription Failed".to_string(),
            message: format!("Speech could not be transcribed: {detail}"),
            actions: vec![
                "Speak again; transient decode errors usually clear themselves".to_string(),
                "Switch to a smaller model if failures repeat".to_string(),
            ],
            help_url: None,
        },
        ErrorKind::ModelLoadFailed(model) => Guidance {
            title: "Model Failed to Load".to_string(),
            message: format!("The speech model \"{model}\" could not be loaded."),
            actions: vec![
                "Re-download the model from preferences".to_string(),
                "Free up disk space and memory, then retry".to_string(),
            ],
            help_url: Some("https://support.example.com/models".to_string()),
        },
        ErrorKind::TextInsertionFailed(detail) => Guidance {
            title: "Text Not Inserted".to_string(),
            message: format!("The transcription could not be typed into the focused app: {detail}"),
            actions: vec![
                "Click into a text field and dictate again".to_string(),
                "Paste from the clipboard as a fallback".to_string(),
            ],
            help_url: None,
        },
        ErrorKind::HotkeyConflict(combo) => Guidance {
            title: "Hotkey Conflict".to_string(),
            message: format!("The shortcut {combo} is already taken by another application."),
            actions: vec![
                "Choose a different shortcut in preferences".to_string(),
                "Or free the shortcut in the conflicting application".to_string(),
            ],
            help_url: Some("https://support.example.com/hotkeys".to_string()),
        },
        ErrorKind::HotkeySystemError(detail) => Guidance {
            title: "Hotkey Listener Error".to_string(),
            message: format!("The global hotkey listener failed: {detail}"),
            actions: vec![
                "Toggle the dictation hotkey off and on in preferences".to_string(),
            ],
            help_url: None,
        },
        ErrorKind::ResourceExhausted(resource) => Guidance {
            title: "System Resources Low".to_string(),
            message: format!("The system is running low on {resource}."),
            actions: vec![
                "Close unused applications".to_string(),
                "Switch to a smaller speech model to reduce memory use".to_string(),
            ],
            help_url: None,
        },
        ErrorKind::ComponentFailure(detail) => Guidance {
            title: format!("{} Problem", component.display_name()),
            message: format!("{}: {detail}", component.description()),
            actions: vec![
                "Restart the application if the problem persists".to_string(),
            ],
            help_url: None,
        },
    }
}
