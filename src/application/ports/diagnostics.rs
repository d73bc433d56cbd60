//! Diagnostics sink port interface

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Component, ErrorKind};

/// Port for the diagnostics/logging collaborator.
///
/// `record_failure` is passive bookkeeping; `critical_issues` answers a
/// health-check request with whatever is currently flagged, which the
/// orchestrator uses for proactive polling.
#[async_trait]
pub trait DiagnosticsSink: Send + Sync {
    /// Record one observed failure
    async fn record_failure(&self, kind: &ErrorKind, component: Component);

    /// Currently-flagged critical issues
    async fn critical_issues(&self) -> Vec<(ErrorKind, Component)>;
}

#[async_trait]
impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for Arc<T> {
    async fn record_failure(&self, kind: &ErrorKind, component: Component) {
        self.as_ref().record_failure(kind, component).await
    }

    async fn critical_issues(&self) -> Vec<(ErrorKind, Component)> {
        self.as_ref().critical_issues().await
    }
}
