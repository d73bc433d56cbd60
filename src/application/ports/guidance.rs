//! Guidance sink port interface

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Component, ErrorKind, Guidance};

/// Port for surfacing structured recovery instructions to a user-facing
/// layer (notification, dialog, status panel).
#[async_trait]
pub trait GuidanceSink: Send + Sync {
    /// Deliver guidance for an error on a component
    async fn surface(&self, guidance: Guidance, kind: &ErrorKind, component: Component);
}

#[async_trait]
impl<T: GuidanceSink + ?Sized> GuidanceSink for Arc<T> {
    async fn surface(&self, guidance: Guidance, kind: &ErrorKind, component: Component) {
        self.as_ref().surface(guidance, kind, component).await
    }
}
