//! Hotkey system port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Hotkey control errors
#[derive(Debug, Clone, Error)]
pub enum HotkeyError {
    #[error("Failed to start hotkey listener: {0}")]
    StartFailed(String),

    #[error("Failed to stop hotkey listener: {0}")]
    StopFailed(String),
}

/// Port for the global hotkey listener.
#[async_trait]
pub trait HotkeySystem: Send + Sync {
    /// Whether the listener is registered and active
    fn is_listening(&self) -> bool;

    /// Register and start the listener
    async fn start_listening(&self) -> Result<(), HotkeyError>;

    /// Unregister the listener
    async fn stop_listening(&self) -> Result<(), HotkeyError>;
}

#[async_trait]
impl<T: HotkeySystem + ?Sized> HotkeySystem for Arc<T> {
    fn is_listening(&self) -> bool {
        self.as_ref().is_listening()
    }

    async fn start_listening(&self) -> Result<(), HotkeyError> {
        self.as_ref().start_listening().await
    }

    async fn stop_listening(&self) -> Result<(), HotkeyError> {
        self.as_ref().stop_listening().await
    }
}
