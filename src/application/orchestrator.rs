//! Recovery orchestrator
//!
//! Top-level coordinator: takes an error report, decides whether automated
//! recovery is allowed, picks a strategy (ledger recommendation first,
//! catalog fallback), drives the executor under a hard timeout, records
//! the outcome, and keeps observers informed of every status transition.
//!
//! Exactly one recovery is in flight at a time. A second report for the
//! same component while one is active is coalesced; a report for a
//! different component queues behind the in-flight attempt on the
//! recovery gate and runs afterwards.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::domain::{
    catalog, guidance_for, Component, ErrorKind, ErrorRecord, ExecutionRecord, FailureReason,
    OutcomeLedger, RecoveryConfig, RecoveryStatus, RecoveryStrategy, MIN_PAIR_SAMPLES,
};

use super::executor::RecoveryExecutor;
use super::ports::{
    AudioSystem, DiagnosticsSink, GuidanceSink, HotkeySystem, PermissionCheck, TextInsertion,
    TranscriptionEngine,
};

/// Observer callback invoked on every status transition
pub type StatusObserver = Arc<dyn Fn(RecoveryStatus) + Send + Sync>;

/// Outcome of one error report.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryReport {
    /// Automated recovery succeeded
    Recovered {
        strategy: RecoveryStrategy,
        duration: Duration,
    },
    /// A recovery for the same component was already in flight
    Coalesced,
    /// Automated recovery was not attempted; guidance was surfaced
    GuidanceSurfaced { reason: FailureReason },
    /// The attempted strategy failed; guidance was surfaced
    RecoveryFailed {
        strategy: RecoveryStrategy,
        reason: FailureReason,
    },
}

struct OrchestratorState {
    status: RecoveryStatus,
    /// Transition counter guarding the delayed return to idle
    epoch: u64,
    active_component: Option<Component>,
    ledger: OutcomeLedger,
    error_log: VecDeque<ErrorRecord>,
    attempts: Vec<(Component, Instant)>,
}

/// Coordinates failure detection and recovery across the dictation stack.
///
/// Explicitly constructed and passed by reference; there is no global
/// instance. Tests build a fresh orchestrator each.
pub struct RecoveryOrchestrator<A, T, X, H, P, D, G>
where
    A: AudioSystem,
    T: TranscriptionEngine,
    X: TextInsertion,
    H: HotkeySystem,
    P: PermissionCheck,
    D: DiagnosticsSink,
    G: GuidanceSink,
{
    executor: RecoveryExecutor<A, T, X, H, P>,
    diagnostics: D,
    guidance: G,
    config: RecoveryConfig,
    state: Arc<StdMutex<OrchestratorState>>,
    observers: Arc<StdMutex<Vec<StatusObserver>>>,
    /// Orders observer notifications with their state writes
    notify: Arc<StdMutex<()>>,
    /// Serializes recovery operations; held across the whole attempt
    gate: AsyncMutex<()>,
}

impl<A, T, X, H, P, D, G> RecoveryOrchestrator<A, T, X, H, P, D, G>
where
    A: AudioSystem,
    T: TranscriptionEngine,
    X: TextInsertion,
    H: HotkeySystem,
    P: PermissionCheck,
    D: DiagnosticsSink,
    G: GuidanceSink,
{
    /// Create an orchestrator over the executor and sinks
    pub fn new(
        executor: RecoveryExecutor<A, T, X, H, P>,
        diagnostics: D,
        guidance: G,
        config: RecoveryConfig,
    ) -> Self {
        let ledger = OutcomeLedger::with_capacity(config.ledger_capacity);
        Self {
            executor,
            diagnostics,
            guidance,
            config,
            state: Arc::new(StdMutex::new(OrchestratorState {
                status: RecoveryStatus::Idle,
                epoch: 0,
                active_component: None,
                ledger,
                error_log: VecDeque::new(),
                attempts: Vec::new(),
            })),
            observers: Arc::new(StdMutex::new(Vec::new())),
            notify: Arc::new(StdMutex::new(())),
            gate: AsyncMutex::new(()),
        }
    }

    /// Register an observer for status transitions.
    ///
    /// Callbacks run on the orchestrator's task after the transition has
    /// been applied; they must not call back into the orchestrator.
    pub fn subscribe(&self, observer: StatusObserver) {
        self.observers.lock().unwrap().push(observer);
    }

    /// Current status
    pub fn status(&self) -> RecoveryStatus {
        self.state.lock().unwrap().status.clone()
    }

    /// Retained execution records, most recent first
    pub fn history(&self) -> Vec<ExecutionRecord> {
        self.state
            .lock()
            .unwrap()
            .ledger
            .records()
            .cloned()
            .collect()
    }

    /// Retained error records, oldest first
    pub fn error_log(&self) -> Vec<ErrorRecord> {
        self.state
            .lock()
            .unwrap()
            .error_log
            .iter()
            .cloned()
            .collect()
    }

    /// Historical success rate of a strategy, in [0, 1]
    pub fn success_rate(&self, strategy: &RecoveryStrategy) -> f64 {
        self.state.lock().unwrap().ledger.success_rate(strategy)
    }

    /// Handle one reported failure.
    ///
    /// Total: every path produces a [`RecoveryReport`], and every attempted
    /// strategy execution appends exactly one [`ExecutionRecord`].
    pub async fn report_error(
        &self,
        kind: ErrorKind,
        component: Component,
        context: HashMap<String, String>,
    ) -> RecoveryReport {
        info!(error = %kind, %component, "failure reported");
        {
            let mut state = self.state.lock().unwrap();
            if state.error_log.len() == self.config.error_log_capacity {
                state.error_log.pop_front();
            }
            state
                .error_log
                .push_back(ErrorRecord::new(kind.clone(), component, context));
        }
        self.diagnostics.record_failure(&kind, component).await;

        if !kind.is_recoverable() {
            warn!(error = %kind, %component, "error requires manual action");
            return self
                .fail_without_attempt(&kind, component, FailureReason::Unrecoverable)
                .await;
        }

        // Coalesce: the in-flight attempt's resolution will be observed.
        {
            let state = self.state.lock().unwrap();
            if state.active_component == Some(component) {
                info!(%component, "recovery already in flight, coalescing report");
                return RecoveryReport::Coalesced;
            }
        }

        // A report for a different component queues here behind the
        // in-flight attempt.
        let _permit = self.gate.lock().await;

        let prior_attempts = {
            let mut state = self.state.lock().unwrap();
            let window = self.config.attempt_window;
            state.attempts.retain(|(_, at)| at.elapsed() < window);
            state
                .attempts
                .iter()
                .filter(|(c, _)| *c == component)
                .count() as u32
        };
        if prior_attempts >= self.config.max_attempts {
            warn!(%component, prior_attempts, "attempt limit reached, skipping automated recovery");
            return self
                .fail_without_attempt(&kind, component, FailureReason::AttemptsExhausted)
                .await;
        }

        {
            let mut state = self.state.lock().unwrap();
            state.active_component = Some(component);
        }
        self.transition(RecoveryStatus::Detecting);

        let strategy = {
            let state = self.state.lock().unwrap();
            if state.ledger.pair_count(&kind, component) >= MIN_PAIR_SAMPLES {
                let recommended = state.ledger.recommend(&kind, component);
                if catalog::is_applicable(&recommended, &kind, component) {
                    recommended
                } else {
                    catalog::select_strategy(&kind, component, prior_attempts)
                }
            } else {
                catalog::select_strategy(&kind, component, prior_attempts)
            }
        };
        info!(
            %strategy,
            %component,
            estimated = ?strategy.estimated_duration(),
            "recovery strategy selected"
        );

        {
            let mut state = self.state.lock().unwrap();
            state.attempts.push((component, Instant::now()));
        }
        self.transition(RecoveryStatus::Recovering {
            component,
            progress: 0.0,
        });

        let snapshot = self.executor.capture_snapshot(component);
        let started = Instant::now();
        let outcome = tokio::select! {
            result = self.executor.execute(&strategy, component) => Some(result),
            () = tokio::time::sleep(self.config.recovery_timeout) => None,
        };
        let duration = started.elapsed();

        let failure = match outcome {
            Some(Ok(())) if self.executor.validate_component(component) => {
                self.record_outcome(&strategy, &kind, component, true, duration);
                {
                    let mut state = self.state.lock().unwrap();
                    if let Some(record) = state
                        .error_log
                        .iter_mut()
                        .rev()
                        .find(|r| r.kind == kind && r.component == component && !r.resolved)
                    {
                        record.mark_resolved();
                    }
                    state.active_component = None;
                }
                info!(%strategy, %component, ?duration, "recovery succeeded");
                self.transition(RecoveryStatus::Recovering {
                    component,
                    progress: 1.0,
                });
                self.transition(RecoveryStatus::Completed { success: true });
                self.schedule_quiescence();
                return RecoveryReport::Recovered { strategy, duration };
            }
            Some(Ok(())) => {
                FailureReason::StrategyFailed("post-recovery validation failed".to_string())
            }
            Some(Err(e)) => FailureReason::StrategyFailed(e.to_string()),
            None => FailureReason::Timeout,
        };

        error!(%strategy, %component, reason = %failure, "recovery attempt failed");
        self.record_outcome(&strategy, &kind, component, false, duration);
        self.executor.rollback(snapshot).await;
        self.surface_guidance(&kind, component, Some(&strategy)).await;
        {
            let mut state = self.state.lock().unwrap();
            state.active_component = None;
        }
        self.transition(RecoveryStatus::Failed {
            reason: failure.clone(),
        });
        self.schedule_quiescence();
        RecoveryReport::RecoveryFailed {
            strategy,
            reason: failure,
        }
    }

    /// Proactive health poll: ask the diagnostics collaborator for flagged
    /// critical issues and route each through the normal pipeline.
    pub async fn poll_health(&self) -> Vec<RecoveryReport> {
        let issues = self.diagnostics.critical_issues().await;
        let mut reports = Vec::with_capacity(issues.len());
        for (kind, component) in issues {
            reports
                .push(self.report_error(kind, component, HashMap::new()).await);
        }
        reports
    }

    async fn fail_without_attempt(
        &self,
        kind: &ErrorKind,
        component: Component,
        reason: FailureReason,
    ) -> RecoveryReport {
        self.surface_guidance(kind, component, None).await;
        // An in-flight recovery owns the status; leave it untouched and
        // let guidance carry this report's outcome.
        let recovery_in_flight = self.state.lock().unwrap().status.is_active();
        if !recovery_in_flight {
            self.transition(RecoveryStatus::Failed {
                reason: reason.clone(),
            });
            self.schedule_quiescence();
        }
        RecoveryReport::GuidanceSurfaced { reason }
    }

    async fn surface_guidance(
        &self,
        kind: &ErrorKind,
        component: Component,
        failed_strategy: Option<&RecoveryStrategy>,
    ) {
        let mut guidance = guidance_for(kind, component);
        // After a failed attempt, tell the user what the system will try
        // next, taken from the fallback chain.
        if let Some(strategy) = failed_strategy {
            if let Some(next) = catalog::fallback_chain(strategy)
                .into_iter()
                .find(|s| {
                    s.can_automate()
                        && !s.requires_user_interaction()
                        && catalog::is_applicable(s, kind, component)
                })
            {
                guidance
                    .actions
                    .push(format!("If the problem persists: {}", next.description()));
            }
        }
        self.guidance.surface(guidance, kind, component).await;
    }

    fn record_outcome(
        &self,
        strategy: &RecoveryStrategy,
        kind: &ErrorKind,
        component: Component,
        success: bool,
        duration: Duration,
    ) {
        let mut state = self.state.lock().unwrap();
        state
            .ledger
            .record(*strategy, kind.clone(), component, success, duration);
    }

    /// Apply a status transition and notify observers, in order.
    ///
    /// The notification lock spans the state write and the callback loop,
    /// so observers see transitions in the order they were applied.
    fn transition(&self, status: RecoveryStatus) {
        let _order = self.notify.lock().unwrap();
        {
            let mut state = self.state.lock().unwrap();
            state.epoch += 1;
            state.status = status.clone();
        }
        let observers: Vec<StatusObserver> = self.observers.lock().unwrap().clone();
        for observer in observers {
            observer(status.clone());
        }
    }

    /// Return to idle after the quiescence delay, unless a newer
    /// transition happened in the meantime.
    fn schedule_quiescence(&self) {
        let state = Arc::clone(&self.state);
        let observers = Arc::clone(&self.observers);
        let notify = Arc::clone(&self.notify);
        let delay = self.config.quiescence_delay;
        let epoch_at = state.lock().unwrap().epoch;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Same ordering discipline as `transition`: the idle write and
            // its notification are atomic with respect to newer transitions.
            let _order = notify.lock().unwrap();
            let superseded = {
                let mut state = state.lock().unwrap();
                if state.epoch == epoch_at {
                    state.epoch += 1;
                    state.status = RecoveryStatus::Idle;
                    false
                } else {
                    true
                }
            };
            if !superseded {
                let observers: Vec<StatusObserver> = observers.lock().unwrap().clone();
                for observer in observers {
                    observer(RecoveryStatus::Idle);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{
        ChannelGuidanceSink, SimulatedAudioSystem, SimulatedHotkeySystem,
        SimulatedPermissionCheck, SimulatedTextInsertion, SimulatedTranscriptionEngine,
        TracingDiagnostics,
    };
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    type SimOrchestrator = RecoveryOrchestrator<
        Arc<SimulatedAudioSystem>,
        Arc<SimulatedTranscriptionEngine>,
        Arc<SimulatedTextInsertion>,
        Arc<SimulatedHotkeySystem>,
        Arc<SimulatedPermissionCheck>,
        Arc<TracingDiagnostics>,
        ChannelGuidanceSink,
    >;

    struct Harness {
        audio: Arc<SimulatedAudioSystem>,
        orchestrator: SimOrchestrator,
        guidance_rx: mpsc::UnboundedReceiver<crate::infrastructure::GuidanceEvent>,
    }

    fn harness(config: RecoveryConfig) -> Harness {
        let audio = Arc::new(SimulatedAudioSystem::new());
        let transcription = Arc::new(SimulatedTranscriptionEngine::new());
        let text_insertion = Arc::new(SimulatedTextInsertion::new());
        let hotkey = Arc::new(SimulatedHotkeySystem::new());
        let permissions = Arc::new(SimulatedPermissionCheck::new());
        let executor = RecoveryExecutor::new(
            Arc::clone(&audio),
            transcription,
            text_insertion,
            hotkey,
            permissions,
            config.settle_delay,
            config.default_model.clone(),
        );
        let (guidance, guidance_rx) = ChannelGuidanceSink::new();
        let orchestrator = RecoveryOrchestrator::new(
            executor,
            Arc::new(TracingDiagnostics::new()),
            guidance,
            config,
        );
        Harness {
            audio,
            orchestrator,
            guidance_rx,
        }
    }

    fn fast_config() -> RecoveryConfig {
        RecoveryConfig {
            settle_delay: Duration::from_millis(1),
            quiescence_delay: Duration::from_millis(10),
            ..RecoveryConfig::default()
        }
    }

    #[tokio::test]
    async fn observers_see_transitions_in_order() {
        let h = harness(fast_config());
        h.audio.set_capturing(true);
        let seen: Arc<Mutex<Vec<RecoveryStatus>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        h.orchestrator
            .subscribe(Arc::new(move |status| sink.lock().unwrap().push(status)));

        h.orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                RecoveryStatus::Detecting,
                RecoveryStatus::Recovering {
                    component: Component::AudioSystem,
                    progress: 0.0
                },
                RecoveryStatus::Recovering {
                    component: Component::AudioSystem,
                    progress: 1.0
                },
                RecoveryStatus::Completed { success: true },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn quiescence_idle_is_ordered_with_later_transitions() {
        let h = harness(fast_config());
        h.audio.set_capturing(true);
        let seen: Arc<Mutex<Vec<RecoveryStatus>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        h.orchestrator
            .subscribe(Arc::new(move |status| sink.lock().unwrap().push(status)));

        h.orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;
        // Let the quiescence task fire before the next report arrives.
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                RecoveryStatus::Detecting,
                RecoveryStatus::Recovering {
                    component: Component::AudioSystem,
                    progress: 0.0
                },
                RecoveryStatus::Recovering {
                    component: Component::AudioSystem,
                    progress: 1.0
                },
                RecoveryStatus::Completed { success: true },
                RecoveryStatus::Idle,
                RecoveryStatus::Detecting,
                RecoveryStatus::Recovering {
                    component: Component::AudioSystem,
                    progress: 0.0
                },
                RecoveryStatus::Recovering {
                    component: Component::AudioSystem,
                    progress: 1.0
                },
                RecoveryStatus::Completed { success: true },
            ]
        );
    }

    #[tokio::test]
    async fn status_returns_to_idle_after_quiescence() {
        let h = harness(fast_config());

        h.orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;
        assert_eq!(
            h.orchestrator.status(),
            RecoveryStatus::Completed { success: true }
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(h.orchestrator.status(), RecoveryStatus::Idle);
    }

    #[tokio::test]
    async fn unrecoverable_error_surfaces_guidance_without_attempt() {
        let mut h = harness(fast_config());

        let report = h
            .orchestrator
            .report_error(
                ErrorKind::PermissionDenied("microphone".to_string()),
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;

        assert_eq!(
            report,
            RecoveryReport::GuidanceSurfaced {
                reason: FailureReason::Unrecoverable
            }
        );
        assert!(h.orchestrator.history().is_empty());
        let event = h.guidance_rx.recv().await.unwrap();
        assert_eq!(event.guidance.title, "Permission Required");
    }

    #[tokio::test]
    async fn error_log_records_context_and_resolution() {
        let h = harness(fast_config());
        let mut context = HashMap::new();
        context.insert("device".to_string(), "Built-in Microphone".to_string());

        h.orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                context,
            )
            .await;

        let log = h.orchestrator.error_log();
        assert_eq!(log.len(), 1);
        assert_eq!(
            log[0].context.get("device"),
            Some(&"Built-in Microphone".to_string())
        );
        assert!(log[0].resolved);
        assert!(log[0].resolved_at.is_some());
    }

    #[tokio::test]
    async fn failed_attempt_leaves_error_unresolved() {
        let h = harness(fast_config());
        h.audio.set_capturing(true);
        h.audio.fail_next_start();

        h.orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;

        let log = h.orchestrator.error_log();
        assert_eq!(log.len(), 1);
        assert!(!log[0].resolved);
    }

    #[tokio::test]
    async fn guidance_after_failure_includes_fallback_hint() {
        let mut h = harness(fast_config());
        h.audio.set_capturing(true);
        h.audio.fail_next_start();

        h.orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;

        let event = h.guidance_rx.recv().await.unwrap();
        assert!(event
            .guidance
            .actions
            .iter()
            .any(|a| a.contains("If the problem persists")));
    }

    #[tokio::test]
    async fn learned_recommendation_overrides_catalog_when_applicable() {
        let h = harness(fast_config());
        // Seed history: the catalog pick (ResetAudio) keeps failing, the
        // full reset keeps working.
        for _ in 0..2 {
            h.orchestrator.record_outcome(
                &RecoveryStrategy::ResetAudio,
                &ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                false,
                Duration::from_millis(5),
            );
        }
        for _ in 0..2 {
            h.orchestrator.record_outcome(
                &RecoveryStrategy::FullSystemReset,
                &ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                true,
                Duration::from_millis(5),
            );
        }

        let report = h
            .orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;

        assert!(matches!(
            report,
            RecoveryReport::Recovered {
                strategy: RecoveryStrategy::FullSystemReset,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn success_rate_reflects_recorded_outcomes() {
        let h = harness(fast_config());

        h.orchestrator
            .report_error(
                ErrorKind::AudioDeviceUnavailable,
                Component::AudioSystem,
                HashMap::new(),
            )
            .await;

        assert_eq!(
            h.orchestrator.success_rate(&RecoveryStrategy::ResetAudio),
            1.0
        );
        assert_eq!(
            h.orchestrator
                .success_rate(&RecoveryStrategy::FullSystemReset),
            0.0
        );
    }
}
