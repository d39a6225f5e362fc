//! Session error types.
//!
//! Every variant maps onto one [`NoticeCategory`]: guarded rejections and
//! resource failures are turned into notices inside the coordinator, while
//! upstream failures are represented in the panel.

use steplight_core::{ActionId, NarrationKey, NoticeCategory};
use steplight_narration::NarrationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Unlock requested for an index other than the next eligible one.
    #[error("Unlock item {expected} first (requested item {requested})")]
    OutOfOrderUnlock { requested: usize, expected: usize },

    /// Unlock requested past the end of the list.
    #[error("There is no item {requested} to unlock (the list has {len})")]
    UnlockOutOfRange { requested: usize, len: usize },

    /// Unlock requested while no reveal list is on screen.
    #[error("There is nothing to unlock right now")]
    NoRevealList,

    #[error("Another explanation is currently playing or loading")]
    NarrationBusy { active: Option<NarrationKey> },

    #[error("There is no explanation to read for {key}")]
    NoExplanation { key: NarrationKey },

    /// The explanation target is not part of what is on screen.
    #[error("That explanation is not available right now")]
    TargetUnavailable,

    /// A guest invoked an action that requires signing in.
    #[error("Sign in to use {}", action.as_str())]
    GatedWhileGuest { action: ActionId },

    /// A producer request is already pending.
    #[error("Please wait for {} to finish", pending.as_str())]
    RequestInFlight { pending: ActionId },

    /// The action does not go through the producer.
    #[error("{} is not a producer request", action.as_str())]
    NotARequest { action: ActionId },

    /// A reply arrived for a request that is not pending.
    #[error("Ignored a reply for a request that is no longer pending")]
    UnknownRequest,

    #[error("Nothing to copy")]
    NothingToCopy,

    #[error("Nothing to rate")]
    NothingToRate,

    #[error("Nothing is playing")]
    NothingPlaying,

    #[error("Copy failed: {0}")]
    Clipboard(String),

    #[error("Narration failed: {0}")]
    Audio(String),

    #[error("{0}")]
    Upstream(String),
}

impl SessionError {
    pub const fn category(&self) -> NoticeCategory {
        match self {
            Self::OutOfOrderUnlock { .. }
            | Self::UnlockOutOfRange { .. }
            | Self::NoRevealList
            | Self::NarrationBusy { .. }
            | Self::TargetUnavailable
            | Self::GatedWhileGuest { .. }
            | Self::RequestInFlight { .. }
            | Self::NotARequest { .. }
            | Self::UnknownRequest => NoticeCategory::Guarded,
            Self::NoExplanation { .. }
            | Self::NothingToCopy
            | Self::NothingToRate
            | Self::NothingPlaying
            | Self::Clipboard(_) => NoticeCategory::Resource,
            Self::Audio(_) | Self::Upstream(_) => NoticeCategory::Upstream,
        }
    }
}

impl From<NarrationError> for SessionError {
    fn from(err: NarrationError) -> Self {
        match err {
            NarrationError::Busy { active } => Self::NarrationBusy { active },
            NarrationError::NoExplanation { key } => Self::NoExplanation { key },
            NarrationError::Channel(e) => Self::Audio(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steplight_core::AudioChannelError;

    #[test]
    fn busy_message_is_user_facing() {
        let err = SessionError::NarrationBusy { active: None };
        assert_eq!(
            err.to_string(),
            "Another explanation is currently playing or loading"
        );
        assert_eq!(err.category(), NoticeCategory::Guarded);
    }

    #[test]
    fn narration_errors_map_across() {
        let err: SessionError =
            NarrationError::Channel(AudioChannelError::Playback("device lost".into())).into();
        assert_eq!(err, SessionError::Audio("Narration playback failed: device lost".into()));
        assert_eq!(err.category(), NoticeCategory::Upstream);
    }

    #[test]
    fn gated_message_names_the_action() {
        let err = SessionError::GatedWhileGuest {
            action: ActionId::NextStep,
        };
        assert_eq!(err.to_string(), "Sign in to use next_step");
    }
}
