//! Event union emitted by a tutoring session.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "narration_started", "key": "hint_0" }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::NarrationKey;
use crate::render::{Notice, RenderState};

/// Like/dislike/copy feedback on the presented response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Copied,
    Liked,
    Disliked,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The render state changed; carries the new snapshot.
    RenderChanged { state: Box<RenderState> },

    /// A rejected action produced a notice.
    Notice { notice: Notice },

    /// An explanation took ownership of the narration channel.
    NarrationStarted { key: NarrationKey },

    /// The owning explanation released the narration channel.
    NarrationStopped { key: NarrationKey },

    /// Feedback the shell may forward to analytics or the producer.
    Reaction { reaction: Reaction },

    /// The viewer asked to authenticate.
    SignInRequested,
}

impl SessionEvent {
    pub fn render_changed(state: RenderState) -> Self {
        Self::RenderChanged {
            state: Box::new(state),
        }
    }
}
