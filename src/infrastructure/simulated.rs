//! Simulated collaborator adapters
//!
//! In-memory implementations of the collaborator ports with injectable
//! failure switches. Used by the test suite and by embedders that want to
//! exercise the recovery pipeline without real hardware.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    AudioError, AudioSystem, HotkeyError, HotkeySystem, PermissionCheck, TextInsertion,
    TranscriptionEngine, TranscriptionError,
};

/// Simulated microphone capture pipeline.
///
/// Healthy by default: not capturing, permission granted.
#[derive(Debug, Default)]
pub struct SimulatedAudioSystem {
    capturing: AtomicBool,
    permission_granted: AtomicBool,
    fail_next_start: AtomicBool,
    fail_stop: AtomicBool,
    stall_start: AtomicBool,
    start_calls: AtomicU32,
    stop_calls: AtomicU32,
}

impl SimulatedAudioSystem {
    /// Create a healthy simulated audio system
    pub fn new() -> Self {
        Self {
            permission_granted: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// Force the capture flag
    pub fn set_capturing(&self, capturing: bool) {
        self.capturing.store(capturing, Ordering::SeqCst);
    }

    /// Set whether permission re-requests succeed
    pub fn set_permission(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    /// Make the next `start_capture` fail
    pub fn fail_next_start(&self) {
        self.fail_next_start.store(true, Ordering::SeqCst);
    }

    /// Make every `stop_capture` fail
    pub fn fail_stops(&self) {
        self.fail_stop.store(true, Ordering::SeqCst);
    }

    /// Make the next `start_capture` block forever, for timeout scenarios.
    /// One-shot so that a later rollback can still restore the flag.
    pub fn stall_next_start(&self) {
        self.stall_start.store(true, Ordering::SeqCst);
    }

    /// Number of `start_capture` calls observed
    pub fn start_calls(&self) -> u32 {
        self.start_calls.load(Ordering::SeqCst)
    }

    /// Number of `stop_capture` calls observed
    pub fn stop_calls(&self) -> u32 {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioSystem for SimulatedAudioSystem {
    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    async fn start_capture(&self) -> Result<(), AudioError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.stall_start.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_next_start.swap(false, Ordering::SeqCst) {
            return Err(AudioError::StartFailed("simulated failure".to_string()));
        }
        self.capturing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_capture(&self) -> Result<(), AudioError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(AudioError::StopFailed("simulated failure".to_string()));
        }
        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn request_permission(&self) -> bool {
        self.permission_granted.load(Ordering::SeqCst)
    }
}

/// Simulated speech-to-text engine. Model loaded by default.
#[derive(Debug)]
pub struct SimulatedTranscriptionEngine {
    model_loaded: AtomicBool,
    fail_load: AtomicBool,
    last_loaded: Mutex<Option<String>>,
    clear_calls: AtomicU32,
}

impl SimulatedTranscriptionEngine {
    /// Create a healthy simulated engine with a loaded model
    pub fn new() -> Self {
        Self {
            model_loaded: AtomicBool::new(true),
            fail_load: AtomicBool::new(false),
            last_loaded: Mutex::new(None),
            clear_calls: AtomicU32::new(0),
        }
    }

    /// Force the model-loaded flag
    pub fn set_model_loaded(&self, loaded: bool) {
        self.model_loaded.store(loaded, Ordering::SeqCst);
    }

    /// Make every `load_model` fail
    pub fn fail_loads(&self) {
        self.fail_load.store(true, Ordering::SeqCst);
    }

    /// The identifier passed to the most recent successful load
    pub fn last_loaded_model(&self) -> Option<String> {
        self.last_loaded.lock().unwrap().clone()
    }

    /// Number of `clear_state` calls observed
    pub fn clear_calls(&self) -> u32 {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedTranscriptionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptionEngine for SimulatedTranscriptionEngine {
    fn is_model_loaded(&self) -> bool {
        self.model_loaded.load(Ordering::SeqCst)
    }

    async fn load_model(&self, model_id: &str) -> Result<(), TranscriptionError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(TranscriptionError::LoadFailed(model_id.to_string()));
        }
        self.model_loaded.store(true, Ordering::SeqCst);
        *self.last_loaded.lock().unwrap() = Some(model_id.to_string());
        Ok(())
    }

    async fn clear_state(&self) -> Result<(), TranscriptionError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Simulated text insertion mechanism. Available by default.
#[derive(Debug)]
pub struct SimulatedTextInsertion {
    available: AtomicBool,
}

impl SimulatedTextInsertion {
    /// Create an available simulated inserter
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
        }
    }

    /// Force the availability flag
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl Default for SimulatedTextInsertion {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInsertion for SimulatedTextInsertion {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

/// Simulated global hotkey listener. Listening by default.
#[derive(Debug)]
pub struct SimulatedHotkeySystem {
    listening: AtomicBool,
    fail_start: AtomicBool,
    start_calls: AtomicU32,
    stop_calls: AtomicU32,
}

impl SimulatedHotkeySystem {
    /// Create a healthy simulated hotkey listener
    pub fn new() -> Self {
        Self {
            listening: AtomicBool::new(true),
            fail_start: AtomicBool::new(false),
            start_calls: AtomicU32::new(0),
            stop_calls: AtomicU32::new(0),
        }
    }

    /// Force the listening flag
    pub fn set_listening(&self, listening: bool) {
        self.listening.store(listening, Ordering::SeqCst);
    }

    /// Make every `start_listening` fail
    pub fn fail_starts(&self) {
        self.fail_start.store(true, Ordering::SeqCst);
    }

    /// Number of `start_listening` calls observed
    pub fn start_calls(&self) -> u32 {
        self.start_calls.load(Ordering::SeqCst)
    }

    /// Number of `stop_listening` calls observed
    pub fn stop_calls(&self) -> u32 {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedHotkeySystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HotkeySystem for SimulatedHotkeySystem {
    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    async fn start_listening(&self) -> Result<(), HotkeyError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(HotkeyError::StartFailed("simulated failure".to_string()));
        }
        self.listening.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_listening(&self) -> Result<(), HotkeyError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.listening.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Simulated OS permission state. Granted by default.
#[derive(Debug)]
pub struct SimulatedPermissionCheck {
    accessibility: AtomicBool,
}

impl SimulatedPermissionCheck {
    /// Create a check with accessibility granted
    pub fn new() -> Self {
        Self {
            accessibility: AtomicBool::new(true),
        }
    }

    /// Force the accessibility permission state
    pub fn set_accessibility(&self, granted: bool) {
        self.accessibility.store(granted, Ordering::SeqCst);
    }
}

impl Default for SimulatedPermissionCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionCheck for SimulatedPermissionCheck {
    fn check_accessibility_permission(&self) -> bool {
        self.accessibility.load(Ordering::SeqCst)
    }
}
