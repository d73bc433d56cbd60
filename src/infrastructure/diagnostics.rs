//! Tracing-backed diagnostics adapter

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::warn;

use crate::application::ports::DiagnosticsSink;
use crate::domain::{Component, ErrorKind, Severity};

/// Diagnostics sink that logs every failure through `tracing` and keeps
/// the critical ones flagged in memory until cleared.
///
/// The flagged list answers proactive health polls; an embedder clears it
/// once the underlying condition is resolved out of band.
#[derive(Debug, Default)]
pub struct TracingDiagnostics {
    flagged: Mutex<Vec<(ErrorKind, Component)>>,
}

impl TracingDiagnostics {
    /// Create an empty diagnostics sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag an issue directly, e.g. from an external watchdog
    pub fn flag_issue(&self, kind: ErrorKind, component: Component) {
        let mut flagged = self.flagged.lock().unwrap();
        if !flagged.iter().any(|(k, c)| *k == kind && *c == component) {
            flagged.push((kind, component));
        }
    }

    /// Drop all flagged issues
    pub fn clear_issues(&self) {
        self.flagged.lock().unwrap().clear();
    }
}

#[async_trait]
impl DiagnosticsSink for TracingDiagnostics {
    async fn record_failure(&self, kind: &ErrorKind, component: Component) {
        warn!(error = %kind, %component, severity = %kind.severity(), "component failure");
        if kind.severity() == Severity::Critical {
            self.flag_issue(kind.clone(), component);
        }
    }

    async fn critical_issues(&self) -> Vec<(ErrorKind, Component)> {
        self.flagged.lock().unwrap().clone()
    }
}
