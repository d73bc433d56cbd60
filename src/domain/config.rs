//! Recovery configuration value object

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the recovery pipeline.
///
/// The defaults are the production values; tests shrink the delays to keep
/// runs fast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Automated attempts allowed per component within `attempt_window`
    pub max_attempts: u32,
    /// Sliding window for the attempt limit
    pub attempt_window: Duration,
    /// Hard timeout for a single recovery execution
    pub recovery_timeout: Duration,
    /// Delay before status returns to idle after completed/failed
    pub quiescence_delay: Duration,
    /// Pause between stopping and restarting a component, letting hardware
    /// settle
    pub settle_delay: Duration,
    /// Retained strategy execution records
    pub ledger_capacity: usize,
    /// Retained error records
    pub error_log_capacity: usize,
    /// Model to load when restarting the transcription engine
    pub default_model: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_window: Duration::from_secs(300),
            recovery_timeout: Duration::from_secs(30),
            quiescence_delay: Duration::from_secs(3),
            settle_delay: Duration::from_millis(500),
            ledger_capacity: 100,
            error_log_capacity: 100,
            default_model: "base.en".to_string(),
        }
    }
}
