//! Transcription engine port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Transcription control errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Failed to load model \"{0}\"")]
    LoadFailed(String),

    #[error("Failed to clear engine state: {0}")]
    ClearFailed(String),
}

/// Port for the speech-to-text engine.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    /// Whether a model is loaded and ready
    fn is_model_loaded(&self) -> bool;

    /// Load the model with the given identifier
    async fn load_model(&self, model_id: &str) -> Result<(), TranscriptionError>;

    /// Drop buffered audio and partial transcription state
    async fn clear_state(&self) -> Result<(), TranscriptionError>;
}

#[async_trait]
impl<T: TranscriptionEngine + ?Sized> TranscriptionEngine for Arc<T> {
    fn is_model_loaded(&self) -> bool {
        self.as_ref().is_model_loaded()
    }

    async fn load_model(&self, model_id: &str) -> Result<(), TranscriptionError> {
        self.as_ref().load_model(model_id).await
    }

    async fn clear_state(&self) -> Result<(), TranscriptionError> {
        self.as_ref().clear_state().await
    }
}
