//! Strategy outcome ledger
//!
//! Bounded, most-recent-first history of recovery attempts, plus the raw
//! error log. The ledger feeds the learning loop: per-strategy success
//! rates computed here may override the catalog's table-driven choice.
//!
//! Learning is raw frequency over whatever history is still retained;
//! there is no recency weighting or significance testing. A strategy with
//! one lucky success can outrank a historically strong one whose records
//! have been evicted. Known simplification, kept deliberately.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use super::catalog;
use super::component::Component;
use super::error::ErrorKind;
use super::strategy::RecoveryStrategy;

/// Minimum records for an exact (error, component) pair before historical
/// performance may override the catalog.
pub const MIN_PAIR_SAMPLES: usize = 3;

/// One completed recovery attempt. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub strategy: RecoveryStrategy,
    pub error: ErrorKind,
    pub component: Component,
    pub success: bool,
    pub duration: Duration,
    pub timestamp: SystemTime,
}

/// One observed failure.
///
/// Created when an error is reported; mutated only to flip `resolved` once
/// a recovery attempt for it succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub component: Component,
    pub timestamp: SystemTime,
    pub context: HashMap<String, String>,
    pub resolved: bool,
    pub resolved_at: Option<SystemTime>,
}

impl ErrorRecord {
    /// Create an unresolved record for a freshly reported error
    pub fn new(kind: ErrorKind, component: Component, context: HashMap<String, String>) -> Self {
        Self {
            kind,
            component,
            timestamp: SystemTime::now(),
            context,
            resolved: false,
            resolved_at: None,
        }
    }

    /// Flag the error as resolved. The only permitted mutation.
    pub fn mark_resolved(&mut self) {
        self.resolved = true;
        self.resolved_at = Some(SystemTime::now());
    }
}

/// Bounded history of strategy executions.
///
/// Append-only with FIFO eviction: once `capacity` is reached, each append
/// evicts exactly the oldest record, regardless of its outcome. Only the
/// orchestrator writes; readers get clones.
#[derive(Debug)]
pub struct OutcomeLedger {
    records: VecDeque<ExecutionRecord>,
    capacity: usize,
}

impl OutcomeLedger {
    /// Default retained history
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Create a ledger with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a ledger retaining at most `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// Append one execution outcome, evicting the oldest beyond capacity.
    pub fn record(
        &mut self,
        strategy: RecoveryStrategy,
        error: ErrorKind,
        component: Component,
        success: bool,
        duration: Duration,
    ) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(ExecutionRecord {
            strategy,
            error,
            component,
            success,
            duration,
            timestamp: SystemTime::now(),
        });
    }

    /// Fraction of attempts of `strategy` that succeeded, in [0, 1].
    /// Returns 0.0 when no attempt has been recorded.
    pub fn success_rate(&self, strategy: &RecoveryStrategy) -> f64 {
        let mut total = 0u32;
        let mut succeeded = 0u32;
        for record in &self.records {
            if record.strategy == *strategy {
                total += 1;
                if record.success {
                    succeeded += 1;
                }
            }
        }
        if total == 0 {
            0.0
        } else {
            f64::from(succeeded) / f64::from(total)
        }
    }

    /// Number of retained records for an exact (error, component) pair
    pub fn pair_count(&self, error: &ErrorKind, component: Component) -> usize {
        self.records
            .iter()
            .filter(|r| r.error == *error && r.component == component)
            .count()
    }

    /// Recommend a strategy for an error/component pair.
    ///
    /// With at least [`MIN_PAIR_SAMPLES`] retained records for the exact
    /// pair, returns the strategy with the highest per-pair success rate,
    /// ties broken by catalog priority. Otherwise defers to the catalog's
    /// table-driven selection for a fresh attempt.
    pub fn recommend(&self, error: &ErrorKind, component: Component) -> RecoveryStrategy {
        let mut by_strategy: HashMap<RecoveryStrategy, (u32, u32)> = HashMap::new();
        for record in &self.records {
            if record.error == *error && record.component == component {
                let entry = by_strategy.entry(record.strategy).or_insert((0, 0));
                entry.1 += 1;
                if record.success {
                    entry.0 += 1;
                }
            }
        }

        let samples: usize = by_strategy.values().map(|(_, total)| *total as usize).sum();
        if samples < MIN_PAIR_SAMPLES {
            return catalog::select_strategy(error, component, 0);
        }

        let mut best: Option<(RecoveryStrategy, f64)> = None;
        for (strategy, (succeeded, total)) in by_strategy {
            let rate = f64::from(succeeded) / f64::from(total);
            let better = match &best {
                None => true,
                Some((current, current_rate)) => {
                    rate > *current_rate
                        || (rate == *current_rate && strategy.priority() > current.priority())
                }
            };
            if better {
                best = Some((strategy, rate));
            }
        }

        match best {
            Some((strategy, _)) => strategy,
            None => catalog::select_strategy(error, component, 0),
        }
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum retained records
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained records, most recent first
    pub fn records(&self) -> impl Iterator<Item = &ExecutionRecord> {
        self.records.iter().rev()
    }
}

impl Default for OutcomeLedger {
    fn default() -> Self {
        Self::new()
    }
}
