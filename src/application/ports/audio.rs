//! Audio system port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Audio control errors
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Failed to stop capture: {0}")]
    StopFailed(String),

    #[error("No audio device available")]
    NoDevice,
}

/// Port for the audio capture pipeline.
///
/// Queries are synchronous flag reads; control operations may block on the
/// device and are bounded by the orchestrator-level timeout.
#[async_trait]
pub trait AudioSystem: Send + Sync {
    /// Whether capture is currently running
    fn is_capturing(&self) -> bool;

    /// Start capturing from the configured input device
    async fn start_capture(&self) -> Result<(), AudioError>;

    /// Stop an active capture
    async fn stop_capture(&self) -> Result<(), AudioError>;

    /// Re-request microphone permission. Returns whether it is granted.
    async fn request_permission(&self) -> bool;
}

#[async_trait]
impl<T: AudioSystem + ?Sized> AudioSystem for Arc<T> {
    fn is_capturing(&self) -> bool {
        self.as_ref().is_capturing()
    }

    async fn start_capture(&self) -> Result<(), AudioError> {
        self.as_ref().start_capture().await
    }

    async fn stop_capture(&self) -> Result<(), AudioError> {
        self.as_ref().stop_capture().await
    }

    async fn request_permission(&self) -> bool {
        self.as_ref().request_permission().await
    }
}
