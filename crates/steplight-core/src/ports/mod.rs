//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the coordinator expects from the world around
//! it. They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No transport types (HTTP, audio device handles) in any signature
//! - One trait per collaborator
//! - In-memory implementations live next to the trait they implement

pub mod audio_channel;
pub mod auth;
pub mod clipboard;
pub mod event_emitter;
pub mod producer;

use std::sync::Arc;

pub use audio_channel::{AudioChannelError, AudioChannelPort, ChannelStatus};
pub use auth::{AuthStatePort, StaticAuthState};
pub use clipboard::{ClipboardError, ClipboardPort, MemoryClipboard};
pub use event_emitter::{ChannelEmitter, NoopEmitter, SessionEventEmitter};
pub use producer::{ActionRequest, ProducerError, ProducerPort, ProducerReply, StreamEvent};

/// Container for every collaborator a session needs.
///
/// Wired once at the composition root and handed to the coordinator.
#[derive(Clone)]
pub struct Collaborators {
    pub producer: Arc<dyn ProducerPort>,
    pub audio: Arc<dyn AudioChannelPort>,
    pub auth: Arc<dyn AuthStatePort>,
    pub clipboard: Arc<dyn ClipboardPort>,
    pub events: Arc<dyn SessionEventEmitter>,
}

impl Collaborators {
    pub fn new(
        producer: Arc<dyn ProducerPort>,
        audio: Arc<dyn AudioChannelPort>,
        auth: Arc<dyn AuthStatePort>,
        clipboard: Arc<dyn ClipboardPort>,
    ) -> Self {
        Self {
            producer,
            audio,
            auth,
            clipboard,
            events: Arc::new(NoopEmitter::new()),
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn SessionEventEmitter>) -> Self {
        self.events = events;
        self
    }
}
