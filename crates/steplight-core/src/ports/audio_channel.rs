//! Audio narration channel port - the single shared text-to-speech sink.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::NarrationKey;

/// Status the channel pushes back whenever playback changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelStatus {
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_muted: bool,
    pub queue_length: usize,
}

impl ChannelStatus {
    /// Audio is playing or paused mid-utterance.
    pub const fn is_busy(&self) -> bool {
        self.is_playing || self.is_paused
    }

    /// Nothing playing, paused, or queued.
    pub const fn is_drained(&self) -> bool {
        !self.is_busy() && self.queue_length == 0
    }
}

/// Errors returned by [`AudioChannelPort::speak`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioChannelError {
    /// No speech engine is available.
    #[error("Narration unavailable: {0}")]
    Unavailable(String),

    /// The engine failed to start playback.
    #[error("Narration playback failed: {0}")]
    Playback(String),
}

/// Port for the narration audio channel.
///
/// Transport controls are synchronous fire-and-forget primitives; starting
/// speech may have to load an engine, so it is async.
#[async_trait]
pub trait AudioChannelPort: Send + Sync {
    /// Queue `text` for playback on behalf of `key`.
    async fn speak(&self, text: &str, key: NarrationKey) -> Result<(), AudioChannelError>;

    /// Stop playback and clear the queue.
    fn stop(&self);

    fn pause(&self);

    fn resume(&self);

    fn set_muted(&self, muted: bool);
}
