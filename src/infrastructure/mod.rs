//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: a
//! tracing-backed diagnostics sink, a channel-backed guidance sink, and
//! simulated collaborators for tests and hardware-free embedding.

pub mod diagnostics;
pub mod guidance;
pub mod simulated;

// Re-export adapters
pub use diagnostics::TracingDiagnostics;
pub use guidance::{ChannelGuidanceSink, GuidanceEvent};
pub use simulated::{
    SimulatedAudioSystem, SimulatedHotkeySystem, SimulatedPermissionCheck, SimulatedTextInsertion,
    SimulatedTranscriptionEngine,
};
