//! Event emitter trait for session events.
//!
//! Implementations handle transport details (channels, Tauri events, SSE, etc.).

use tokio::sync::mpsc;

use crate::events::SessionEvent;

/// Trait for emitting session events.
///
/// Keeps channel types out of the coordinator's public API.
pub trait SessionEventEmitter: Send + Sync {
    /// Emit an event. Must not block.
    fn emit(&self, event: SessionEvent);
}

/// A no-op emitter for tests and contexts without a listener.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    pub const fn new() -> Self {
        Self
    }
}

impl SessionEventEmitter for NoopEmitter {
    fn emit(&self, _event: SessionEvent) {}
}

/// Emitter that forwards events into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelEmitter {
    /// Create an emitter and the receiver that observes it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SessionEventEmitter for ChannelEmitter {
    fn emit(&self, event: SessionEvent) {
        // Best-effort: a dropped receiver just means nobody is listening.
        if self.tx.send(event).is_err() {
            tracing::trace!("Session event receiver dropped");
        }
    }
}
