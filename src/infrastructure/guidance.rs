//! Channel-backed guidance adapter

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::application::ports::GuidanceSink;
use crate::domain::{Component, ErrorKind, Guidance};

/// One delivered piece of guidance, as seen by the user-facing layer.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidanceEvent {
    pub guidance: Guidance,
    pub kind: ErrorKind,
    pub component: Component,
}

/// Guidance sink that forwards events over an unbounded channel to
/// whatever UI layer is listening. Dropped receivers are tolerated: the
/// orchestrator must never fail because nobody is watching.
#[derive(Debug)]
pub struct ChannelGuidanceSink {
    tx: mpsc::UnboundedSender<GuidanceEvent>,
}

impl ChannelGuidanceSink {
    /// Create a sink and the receiver for the user-facing layer
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GuidanceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl GuidanceSink for ChannelGuidanceSink {
    async fn surface(&self, guidance: Guidance, kind: &ErrorKind, component: Component) {
        info!(title = %guidance.title, %component, "surfacing recovery guidance");
        let _ = self.tx.send(GuidanceEvent {
            guidance,
            kind: kind.clone(),
            component,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guidance_for;

    #[tokio::test]
    async fn surfaced_guidance_arrives_on_the_channel() {
        let (sink, mut rx) = ChannelGuidanceSink::new();
        let kind = ErrorKind::AudioDeviceUnavailable;
        let guidance = guidance_for(&kind, Component::AudioSystem);

        sink.surface(guidance.clone(), &kind, Component::AudioSystem)
            .await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.guidance, guidance);
        assert_eq!(event.kind, kind);
        assert_eq!(event.component, Component::AudioSystem);
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_error() {
        let (sink, rx) = ChannelGuidanceSink::new();
        drop(rx);

        let kind = ErrorKind::AudioDeviceUnavailable;
        sink.surface(
            guidance_for(&kind, Component::AudioSystem),
            &kind,
            Component::AudioSystem,
        )
        .await;
    }
}
