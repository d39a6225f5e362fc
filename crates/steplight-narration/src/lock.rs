//! Explanation narration lock - a single owner for the shared audio channel.
//!
//! Every explanation toggle on a screen routes through one lock. The lock is
//! pure state; the coordinator issues the actual `speak`/`stop` calls based
//! on what the lock returns.
//!
//! ```text
//!   Free ──request(k)──▶ Owned(k) ──collapse(k) / release()──▶ Free
//!                           │
//!                           └──channel drained after playing──▶ Free
//! ```
//!
//! Two separate facts decide whether a new key may start:
//!
//! - `active`: the key that logically owns narration right now.
//! - the last [`ChannelStatus`] pushed by the channel, together with the key
//!   that last spoke. A channel that still reports playing, paused, or queued
//!   audio for a different key blocks new requests even after `active` was cleared,
//!   because audio hardware lags behind client-side state.

use steplight_core::{ChannelStatus, NarrationKey};

use crate::error::NarrationError;

/// Successful outcome of [`NarrationLock::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    /// The key now owns the channel; the caller must start speaking.
    Started,
    /// The key already owned the channel; nothing to do.
    AlreadyActive,
}

#[derive(Debug, Clone, Default)]
pub struct NarrationLock {
    /// Key that logically owns narration.
    active: Option<NarrationKey>,

    /// Key whose text was last handed to the channel.
    channel_owner: Option<NarrationKey>,

    /// Last status pushed by the channel.
    channel: ChannelStatus,

    /// Whether the channel has reported activity since `active` was taken.
    /// Completion is only inferred from a drained status after this is set,
    /// so a stale "idle" push that predates playback cannot end a narration.
    heard_playback: bool,
}

impl NarrationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn active(&self) -> Option<NarrationKey> {
        self.active
    }

    pub const fn channel_status(&self) -> ChannelStatus {
        self.channel
    }

    /// Whether a request for `key` would be refused right now.
    pub fn is_busy_for(&self, key: NarrationKey) -> bool {
        self.blocker(key).is_some()
    }

    /// Request narration ownership for `key`.
    ///
    /// Succeeds when nothing is active or `key` is already active. A
    /// different active key, or a channel still playing audio that belongs
    /// to another key, yields [`NarrationError::Busy`] with no state change.
    pub fn request(&mut self, key: NarrationKey) -> Result<Acquired, NarrationError> {
        if self.active == Some(key) {
            return Ok(Acquired::AlreadyActive);
        }

        if let Some(active) = self.blocker(key) {
            tracing::debug!(requested = %key, ?active, "Narration busy");
            return Err(NarrationError::Busy { active });
        }

        tracing::debug!(%key, "Narration acquired");
        self.active = Some(key);
        self.channel_owner = Some(key);
        self.heard_playback = false;
        Ok(Acquired::Started)
    }

    /// The panel for `key` was closed.
    ///
    /// Returns `true` when `key` owned the channel; the caller must then stop
    /// the channel. Closing a panel that is not narrating changes nothing.
    pub fn collapse(&mut self, key: NarrationKey) -> bool {
        if self.active != Some(key) {
            return false;
        }
        tracing::debug!(%key, "Narration collapsed");
        self.active = None;
        true
    }

    /// Drop ownership regardless of key, returning the key that owned it.
    ///
    /// Used when the content the key refers to disappears (shape switch,
    /// teardown). The caller must stop the channel when this returns `Some`.
    pub fn release(&mut self) -> Option<NarrationKey> {
        let released = self.active.take();
        if let Some(key) = released {
            tracing::debug!(%key, "Narration released");
        }
        released
    }

    /// Undo a [`request`](Self::request) whose `speak` call failed.
    pub fn abort(&mut self, key: NarrationKey) {
        if self.active == Some(key) {
            self.active = None;
            if self.channel.is_drained() {
                self.channel_owner = None;
            }
        }
    }

    /// Record a status pushed by the channel.
    ///
    /// Returns the key whose narration completed, if this status marks the
    /// end of playback for the active key.
    pub fn observe_channel(&mut self, status: ChannelStatus) -> Option<NarrationKey> {
        self.channel = status;

        if !status.is_drained() {
            self.heard_playback = true;
            return None;
        }

        if self.heard_playback {
            self.heard_playback = false;
            let finished = self.active.take();
            if let Some(key) = finished {
                tracing::debug!(%key, "Narration finished");
            }
            return finished;
        }

        None
    }

    fn blocker(&self, key: NarrationKey) -> Option<Option<NarrationKey>> {
        match self.active {
            Some(active) if active != key => Some(Some(active)),
            Some(_) => None,
            None if !self.channel.is_drained() && self.channel_owner != Some(key) => {
                Some(self.channel_owner)
            }
            None => None,
        }
    }
}
