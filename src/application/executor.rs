//! Component recovery executor
//!
//! Performs the concrete remediation for each strategy against the port
//! interfaces, validates the result, and knows how to roll a component
//! back to its pre-attempt state from a snapshot.
//!
//! The snapshot protocol: the caller captures a [`ComponentSnapshot`]
//! before any reset, runs the reset, and on failure hands the snapshot to
//! [`RecoveryExecutor::rollback`], which consumes it. A snapshot is never
//! applied twice.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Component, RecoveryStrategy};

use super::ports::{
    AudioError, AudioSystem, HotkeyError, HotkeySystem, PermissionCheck, TextInsertion,
    TranscriptionEngine, TranscriptionError,
};

/// Errors from a recovery execution
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Audio control failed: {0}")]
    Audio(#[from] AudioError),

    #[error("Transcription control failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Hotkey control failed: {0}")]
    Hotkey(#[from] HotkeyError),

    #[error("Permission still denied after re-request")]
    PermissionDenied,

    #[error("Validation failed for {component}: {detail}")]
    ValidationFailed {
        component: Component,
        detail: String,
    },
}

/// Point-in-time capture of a component's observable flags, taken
/// immediately before a recovery attempt. Consumed exactly once: applied
/// by [`RecoveryExecutor::rollback`] or dropped on success.
#[derive(Debug, PartialEq, Eq)]
pub enum ComponentSnapshot {
    Audio { was_capturing: bool },
    Transcription { model_was_loaded: bool },
    Hotkey { was_listening: bool },
    TextInsertion { was_available: bool },
    SystemResources,
}

impl ComponentSnapshot {
    /// The component this snapshot belongs to
    pub fn component(&self) -> Component {
        match self {
            Self::Audio { .. } => Component::AudioSystem,
            Self::Transcription { .. } => Component::TranscriptionEngine,
            Self::Hotkey { .. } => Component::HotkeySystem,
            Self::TextInsertion { .. } => Component::TextInsertion,
            Self::SystemResources => Component::SystemResources,
        }
    }
}

/// Executes recovery strategies against the collaborator ports.
pub struct RecoveryExecutor<A, T, X, H, P>
where
    A: AudioSystem,
    T: TranscriptionEngine,
    X: TextInsertion,
    H: HotkeySystem,
    P: PermissionCheck,
{
    audio: A,
    transcription: T,
    text_insertion: X,
    hotkey: H,
    permissions: P,
    settle_delay: Duration,
    default_model: String,
}

impl<A, T, X, H, P> RecoveryExecutor<A, T, X, H, P>
where
    A: AudioSystem,
    T: TranscriptionEngine,
    X: TextInsertion,
    H: HotkeySystem,
    P: PermissionCheck,
{
    /// Create an executor over the collaborator ports
    pub fn new(
        audio: A,
        transcription: T,
        text_insertion: X,
        hotkey: H,
        permissions: P,
        settle_delay: Duration,
        default_model: String,
    ) -> Self {
        Self {
            audio,
            transcription,
            text_insertion,
            hotkey,
            permissions,
            settle_delay,
            default_model,
        }
    }

    /// Capture the observable flags of a component before a reset.
    pub fn capture_snapshot(&self, component: Component) -> ComponentSnapshot {
        match component {
            Component::AudioSystem => ComponentSnapshot::Audio {
                was_capturing: self.audio.is_capturing(),
            },
            Component::TranscriptionEngine => ComponentSnapshot::Transcription {
                model_was_loaded: self.transcription.is_model_loaded(),
            },
            Component::HotkeySystem => ComponentSnapshot::Hotkey {
                was_listening: self.hotkey.is_listening(),
            },
            Component::TextInsertion => ComponentSnapshot::TextInsertion {
                was_available: self.text_insertion.is_available(),
            },
            Component::SystemResources => ComponentSnapshot::SystemResources,
        }
    }

    /// Perform a strategy's remediation and validate the result.
    ///
    /// Does not capture or roll back; the caller owns the snapshot so that
    /// rollback stays possible even when this future is cancelled by the
    /// orchestrator timeout.
    pub async fn execute(
        &self,
        strategy: &RecoveryStrategy,
        component: Component,
    ) -> Result<(), ExecutorError> {
        debug!(%strategy, %component, "executing recovery strategy");
        match strategy {
            RecoveryStrategy::RequestPermissions => self.request_permissions().await,
            RecoveryStrategy::ResetAudio => self.reset_audio().await,
            RecoveryStrategy::RestartTranscription => self.restart_transcription().await,
            RecoveryStrategy::RetryTextInsertion => self.retry_text_insertion().await,
            RecoveryStrategy::ResetComponent(target) => self.reset_component(*target).await,
            RecoveryStrategy::FullSystemReset => self.full_system_reset().await,
            // No remediation action: the orchestrator surfaces guidance /
            // accepts degraded operation.
            RecoveryStrategy::UserGuided | RecoveryStrategy::GracefulDegradation => Ok(()),
        }
    }

    /// Idempotent health check for a component. Never mutates state;
    /// returns true for a healthy component.
    pub fn validate_component(&self, component: Component) -> bool {
        match component {
            Component::HotkeySystem => self.hotkey.is_listening(),
            Component::TranscriptionEngine => self.transcription.is_model_loaded(),
            Component::TextInsertion => self.text_insertion.is_available(),
            // Capture is user-initiated, so there is no steady-state flag
            // to demand; the reset action itself verifies the flag was
            // restored.
            Component::AudioSystem => true,
            Component::SystemResources => true,
        }
    }

    /// Best-effort restore of a component to its snapshotted state.
    ///
    /// Issues the inverse control operation for each flag that drifted.
    /// Failures are logged, never returned, so a failed rollback cannot
    /// mask the original recovery failure.
    pub async fn rollback(&self, snapshot: ComponentSnapshot) {
        debug!(component = %snapshot.component(), "rolling back recovery attempt");
        match snapshot {
            ComponentSnapshot::Audio { was_capturing } => {
                let capturing = self.audio.is_capturing();
                if was_capturing && !capturing {
                    if let Err(e) = self.audio.start_capture().await {
                        warn!(error = %e, "rollback failed to resume audio capture");
                    }
                } else if !was_capturing && capturing {
                    if let Err(e) = self.audio.stop_capture().await {
                        warn!(error = %e, "rollback failed to stop audio capture");
                    }
                }
            }
            ComponentSnapshot::Hotkey { was_listening } => {
                let listening = self.hotkey.is_listening();
                if was_listening && !listening {
                    if let Err(e) = self.hotkey.start_listening().await {
                        warn!(error = %e, "rollback failed to restart hotkey listener");
                    }
                } else if !was_listening && listening {
                    if let Err(e) = self.hotkey.stop_listening().await {
                        warn!(error = %e, "rollback failed to stop hotkey listener");
                    }
                }
            }
            ComponentSnapshot::Transcription { model_was_loaded } => {
                // Unloading is not a collaborator operation; only reload a
                // model that went missing.
                if model_was_loaded && !self.transcription.is_model_loaded() {
                    if let Err(e) = self.transcription.load_model(&self.default_model).await {
                        warn!(error = %e, "rollback failed to reload model");
                    }
                }
            }
            // Availability is read-only; nothing to restore.
            ComponentSnapshot::TextInsertion { .. } => {}
            ComponentSnapshot::SystemResources => {}
        }
    }

    async fn request_permissions(&self) -> Result<(), ExecutorError> {
        let microphone = self.audio.request_permission().await;
        let accessibility = self.permissions.check_accessibility_permission();
        if microphone && accessibility {
            Ok(())
        } else {
            Err(ExecutorError::PermissionDenied)
        }
    }

    /// Stop capture if running, let the hardware settle, resume only if it
    /// was previously active, then verify the flag matches.
    async fn reset_audio(&self) -> Result<(), ExecutorError> {
        let was_capturing = self.audio.is_capturing();
        if was_capturing {
            self.audio.stop_capture().await?;
        }
        tokio::time::sleep(self.settle_delay).await;
        if was_capturing {
            self.audio.start_capture().await?;
        }
        if self.audio.is_capturing() != was_capturing {
            return Err(ExecutorError::ValidationFailed {
                component: Component::AudioSystem,
                detail: "capture flag does not match pre-reset state".to_string(),
            });
        }
        Ok(())
    }

    async fn restart_transcription(&self) -> Result<(), ExecutorError> {
        self.transcription.clear_state().await?;
        if !self.transcription.is_model_loaded() {
            self.transcription.load_model(&self.default_model).await?;
        }
        if !self.transcription.is_model_loaded() {
            return Err(ExecutorError::ValidationFailed {
                component: Component::TranscriptionEngine,
                detail: "model not loaded after restart".to_string(),
            });
        }
        Ok(())
    }

    async fn retry_text_insertion(&self) -> Result<(), ExecutorError> {
        tokio::time::sleep(self.settle_delay).await;
        if self.text_insertion.is_available() {
            Ok(())
        } else {
            Err(ExecutorError::ValidationFailed {
                component: Component::TextInsertion,
                detail: "text insertion still unavailable".to_string(),
            })
        }
    }

    async fn reset_hotkey(&self) -> Result<(), ExecutorError> {
        if self.hotkey.is_listening() {
            self.hotkey.stop_listening().await?;
        }
        tokio::time::sleep(self.settle_delay).await;
        self.hotkey.start_listening().await?;
        if !self.hotkey.is_listening() {
            return Err(ExecutorError::ValidationFailed {
                component: Component::HotkeySystem,
                detail: "listener not active after reset".to_string(),
            });
        }
        Ok(())
    }

    async fn reset_component(&self, component: Component) -> Result<(), ExecutorError> {
        match component {
            Component::AudioSystem => self.reset_audio().await,
            Component::TranscriptionEngine => self.restart_transcription().await,
            Component::HotkeySystem => self.reset_hotkey().await,
            Component::TextInsertion => self.retry_text_insertion().await,
            // Nothing to actively reset; give the system a moment and let
            // validation speak.
            Component::SystemResources => {
                tokio::time::sleep(self.settle_delay).await;
                Ok(())
            }
        }
    }

    /// Reset hotkey, audio, transcription and text insertion in fixed
    /// order, then validate all four. A failure partway does not roll back
    /// earlier successful resets: this is the coarse recovery of last
    /// resort.
    async fn full_system_reset(&self) -> Result<(), ExecutorError> {
        let mut first_error: Option<ExecutorError> = None;
        for component in [
            Component::HotkeySystem,
            Component::AudioSystem,
            Component::TranscriptionEngine,
            Component::TextInsertion,
        ] {
            if let Err(e) = self.reset_component(component).await {
                warn!(%component, error = %e, "full system reset: component reset failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }
        for component in [
            Component::HotkeySystem,
            Component::AudioSystem,
            Component::TranscriptionEngine,
            Component::TextInsertion,
        ] {
            if !self.validate_component(component) {
                return Err(ExecutorError::ValidationFailed {
                    component,
                    detail: "unhealthy after full system reset".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::simulated::{
        SimulatedAudioSystem, SimulatedHotkeySystem, SimulatedPermissionCheck,
        SimulatedTextInsertion, SimulatedTranscriptionEngine,
    };
    use std::sync::Arc;

    type SimExecutor = RecoveryExecutor<
        Arc<SimulatedAudioSystem>,
        Arc<SimulatedTranscriptionEngine>,
        Arc<SimulatedTextInsertion>,
        Arc<SimulatedHotkeySystem>,
        Arc<SimulatedPermissionCheck>,
    >;

    struct Sim {
        audio: Arc<SimulatedAudioSystem>,
        transcription: Arc<SimulatedTranscriptionEngine>,
        text_insertion: Arc<SimulatedTextInsertion>,
        hotkey: Arc<SimulatedHotkeySystem>,
        executor: SimExecutor,
    }

    fn sim() -> Sim {
        let audio = Arc::new(SimulatedAudioSystem::new());
        let transcription = Arc::new(SimulatedTranscriptionEngine::new());
        let text_insertion = Arc::new(SimulatedTextInsertion::new());
        let hotkey = Arc::new(SimulatedHotkeySystem::new());
        let permissions = Arc::new(SimulatedPermissionCheck::new());
        let executor = RecoveryExecutor::new(
            Arc::clone(&audio),
            Arc::clone(&transcription),
            Arc::clone(&text_insertion),
            Arc::clone(&hotkey),
            permissions,
            Duration::from_millis(1),
            "base.en".to_string(),
        );
        Sim {
            audio,
            transcription,
            text_insertion,
            hotkey,
            executor,
        }
    }

    #[tokio::test]
    async fn reset_audio_restores_active_capture() {
        let sim = sim();
        sim.audio.set_capturing(true);

        sim.executor
            .execute(&RecoveryStrategy::ResetAudio, Component::AudioSystem)
            .await
            .unwrap();

        assert!(sim.audio.is_capturing());
        // Stopped once and resumed once.
        assert_eq!(sim.audio.stop_calls(), 1);
        assert_eq!(sim.audio.start_calls(), 1);
    }

    #[tokio::test]
    async fn reset_audio_leaves_inactive_capture_stopped() {
        let sim = sim();

        sim.executor
            .execute(&RecoveryStrategy::ResetAudio, Component::AudioSystem)
            .await
            .unwrap();

        assert!(!sim.audio.is_capturing());
        assert_eq!(sim.audio.stop_calls(), 0);
        assert_eq!(sim.audio.start_calls(), 0);
    }

    #[tokio::test]
    async fn reset_audio_propagates_start_failure() {
        let sim = sim();
        sim.audio.set_capturing(true);
        sim.audio.fail_next_start();

        let err = sim
            .executor
            .execute(&RecoveryStrategy::ResetAudio, Component::AudioSystem)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::Audio(_)));
        assert!(!sim.audio.is_capturing());
    }

    #[tokio::test]
    async fn restart_transcription_reloads_missing_model() {
        let sim = sim();
        sim.transcription.set_model_loaded(false);

        sim.executor
            .execute(
                &RecoveryStrategy::RestartTranscription,
                Component::TranscriptionEngine,
            )
            .await
            .unwrap();

        assert!(sim.transcription.is_model_loaded());
        assert_eq!(sim.transcription.last_loaded_model(), Some("base.en".to_string()));
    }

    #[tokio::test]
    async fn restart_transcription_fails_when_load_fails() {
        let sim = sim();
        sim.transcription.set_model_loaded(false);
        sim.transcription.fail_loads();

        let err = sim
            .executor
            .execute(
                &RecoveryStrategy::RestartTranscription,
                Component::TranscriptionEngine,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::Transcription(_)));
    }

    #[tokio::test]
    async fn hotkey_reset_restarts_listener() {
        let sim = sim();
        sim.hotkey.set_listening(true);

        sim.executor
            .execute(
                &RecoveryStrategy::ResetComponent(Component::HotkeySystem),
                Component::HotkeySystem,
            )
            .await
            .unwrap();

        assert!(sim.hotkey.is_listening());
    }

    #[tokio::test]
    async fn retry_text_insertion_fails_when_unavailable() {
        let sim = sim();
        sim.text_insertion.set_available(false);

        let err = sim
            .executor
            .execute(&RecoveryStrategy::RetryTextInsertion, Component::TextInsertion)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExecutorError::ValidationFailed {
                component: Component::TextInsertion,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn full_system_reset_resets_everything_in_order() {
        let sim = sim();
        sim.audio.set_capturing(true);
        sim.hotkey.set_listening(true);
        sim.transcription.set_model_loaded(false);

        sim.executor
            .execute(&RecoveryStrategy::FullSystemReset, Component::AudioSystem)
            .await
            .unwrap();

        assert!(sim.hotkey.is_listening());
        assert!(sim.audio.is_capturing());
        assert!(sim.transcription.is_model_loaded());
        assert!(sim.text_insertion.is_available());
    }

    #[tokio::test]
    async fn full_system_reset_does_not_roll_back_earlier_successes() {
        let sim = sim();
        sim.hotkey.set_listening(false);
        sim.transcription.set_model_loaded(false);
        sim.transcription.fail_loads();

        let result = sim
            .executor
            .execute(&RecoveryStrategy::FullSystemReset, Component::SystemResources)
            .await;

        assert!(result.is_err());
        // The hotkey listener stays started even though a later component
        // failed.
        assert!(sim.hotkey.is_listening());
    }

    #[tokio::test]
    async fn user_guided_and_degradation_perform_no_action() {
        let sim = sim();
        sim.executor
            .execute(&RecoveryStrategy::UserGuided, Component::AudioSystem)
            .await
            .unwrap();
        sim.executor
            .execute(&RecoveryStrategy::GracefulDegradation, Component::AudioSystem)
            .await
            .unwrap();
        assert_eq!(sim.audio.start_calls(), 0);
        assert_eq!(sim.audio.stop_calls(), 0);
    }

    #[tokio::test]
    async fn snapshot_reflects_observable_flags() {
        let sim = sim();
        sim.audio.set_capturing(true);

        let snapshot = sim.executor.capture_snapshot(Component::AudioSystem);
        assert_eq!(snapshot, ComponentSnapshot::Audio { was_capturing: true });
        assert_eq!(snapshot.component(), Component::AudioSystem);
    }

    #[tokio::test]
    async fn rollback_resumes_capture_that_was_active() {
        let sim = sim();
        let snapshot = ComponentSnapshot::Audio { was_capturing: true };
        // Capture died during the failed attempt.
        sim.audio.set_capturing(false);

        sim.executor.rollback(snapshot).await;
        assert!(sim.audio.is_capturing());
    }

    #[tokio::test]
    async fn rollback_stops_capture_that_was_inactive() {
        let sim = sim();
        let snapshot = ComponentSnapshot::Audio {
            was_capturing: false,
        };
        sim.audio.set_capturing(true);

        sim.executor.rollback(snapshot).await;
        assert!(!sim.audio.is_capturing());
    }

    #[tokio::test]
    async fn rollback_swallows_control_failures() {
        let sim = sim();
        sim.audio.fail_next_start();

        // Must not panic or surface the error.
        sim.executor
            .rollback(ComponentSnapshot::Audio { was_capturing: true })
            .await;
        assert!(!sim.audio.is_capturing());
    }

    #[tokio::test]
    async fn rollback_reloads_previously_loaded_model() {
        let sim = sim();
        sim.transcription.set_model_loaded(false);

        sim.executor
            .rollback(ComponentSnapshot::Transcription {
                model_was_loaded: true,
            })
            .await;
        assert!(sim.transcription.is_model_loaded());
    }

    #[tokio::test]
    async fn validate_component_is_idempotent_on_healthy_components() {
        let sim = sim();
        sim.hotkey.set_listening(true);

        for _ in 0..3 {
            assert!(sim.executor.validate_component(Component::HotkeySystem));
            assert!(sim.executor.validate_component(Component::TranscriptionEngine));
            assert!(sim.executor.validate_component(Component::TextInsertion));
            assert!(sim.executor.validate_component(Component::AudioSystem));
            assert!(sim.executor.validate_component(Component::SystemResources));
        }
        // No control operations were issued by validation.
        assert_eq!(sim.audio.start_calls(), 0);
        assert_eq!(sim.audio.stop_calls(), 0);
        assert_eq!(sim.hotkey.start_calls(), 0);
    }

    #[tokio::test]
    async fn validate_component_detects_unhealthy_flags() {
        let sim = sim();
        sim.hotkey.set_listening(false);
        sim.transcription.set_model_loaded(false);
        sim.text_insertion.set_available(false);

        assert!(!sim.executor.validate_component(Component::HotkeySystem));
        assert!(!sim.executor.validate_component(Component::TranscriptionEngine));
        assert!(!sim.executor.validate_component(Component::TextInsertion));
    }

    #[tokio::test]
    async fn request_permissions_fails_when_still_denied() {
        let audio = Arc::new(SimulatedAudioSystem::new());
        audio.set_permission(false);
        let executor = RecoveryExecutor::new(
            Arc::clone(&audio),
            Arc::new(SimulatedTranscriptionEngine::new()),
            Arc::new(SimulatedTextInsertion::new()),
            Arc::new(SimulatedHotkeySystem::new()),
            Arc::new(SimulatedPermissionCheck::new()),
            Duration::from_millis(1),
            "base.en".to_string(),
        );

        let err = executor
            .execute(&RecoveryStrategy::RequestPermissions, Component::AudioSystem)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::PermissionDenied));
    }
}
