//! Narration error types.

use steplight_core::{AudioChannelError, NarrationKey};

/// Errors that can occur when starting or stopping a narration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrationError {
    /// Another explanation owns the channel, or the channel is still
    /// draining audio for one.
    #[error("Another explanation is currently playing or loading")]
    Busy {
        /// Current owner, when known.
        active: Option<NarrationKey>,
    },

    /// The explanation has no speakable text.
    #[error("There is no explanation to read for {key}")]
    NoExplanation { key: NarrationKey },

    /// The audio channel refused to start playback.
    #[error(transparent)]
    Channel(#[from] AudioChannelError),
}
