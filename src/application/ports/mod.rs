//! Port interfaces (traits) for external collaborators
//!
//! These traits are the narrow boundary between the recovery core and the
//! subsystems it repairs. The core never reaches past them into
//! collaborator internals.

pub mod audio;
pub mod diagnostics;
pub mod guidance;
pub mod hotkey;
pub mod permissions;
pub mod text_insertion;
pub mod transcription;

// Re-export common types
pub use audio::{AudioError, AudioSystem};
pub use diagnostics::DiagnosticsSink;
pub use guidance::GuidanceSink;
pub use hotkey::{HotkeyError, HotkeySystem};
pub use permissions::PermissionCheck;
pub use text_insertion::TextInsertion;
pub use transcription::{TranscriptionEngine, TranscriptionError};
