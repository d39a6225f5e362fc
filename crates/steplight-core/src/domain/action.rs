//! Identifiers for every user-triggered action the coordinator accepts.

use serde::{Deserialize, Serialize};

/// Stable action identifier.
///
/// Unlocking an item of a step list is reported as [`ActionId::NextStep`]:
/// revealing the next step and requesting it are the same upstream action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Hint,
    NextStep,
    UnlockHint,
    FinalVerification,
    ToggleExplanation,
    Copy,
    Like,
    Dislike,
    ToggleMute,
    TogglePlay,
    SignIn,
    DismissSignIn,
}

impl ActionId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hint => "hint",
            Self::NextStep => "next_step",
            Self::UnlockHint => "unlock_hint",
            Self::FinalVerification => "final_verification",
            Self::ToggleExplanation => "toggle_explanation",
            Self::Copy => "copy",
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::ToggleMute => "toggle_mute",
            Self::TogglePlay => "toggle_play",
            Self::SignIn => "sign_in",
            Self::DismissSignIn => "dismiss_sign_in",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|a| a.as_str() == s)
    }

    pub const fn all() -> [Self; 12] {
        [
            Self::Hint,
            Self::NextStep,
            Self::UnlockHint,
            Self::FinalVerification,
            Self::ToggleExplanation,
            Self::Copy,
            Self::Like,
            Self::Dislike,
            Self::ToggleMute,
            Self::TogglePlay,
            Self::SignIn,
            Self::DismissSignIn,
        ]
    }

    /// Actions an unauthenticated viewer may not perform.
    pub const fn is_gated(&self) -> bool {
        matches!(self, Self::NextStep | Self::FinalVerification)
    }

    /// Actions that go through the upstream producer.
    pub const fn is_producer_bound(&self) -> bool {
        matches!(
            self,
            Self::Hint | Self::NextStep | Self::UnlockHint | Self::FinalVerification
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips_for_every_action() {
        for action in ActionId::all() {
            assert_eq!(ActionId::from_str(action.as_str()), Some(action));
        }
        assert_eq!(ActionId::from_str("upvote"), None);
    }

    #[test]
    fn only_step_and_verification_actions_are_gated() {
        let gated: Vec<_> = ActionId::all().into_iter().filter(ActionId::is_gated).collect();
        assert_eq!(gated, vec![ActionId::NextStep, ActionId::FinalVerification]);
    }

    #[test]
    fn serde_uses_snake_case_ids() {
        let json = serde_json::to_string(&ActionId::FinalVerification).unwrap();
        assert_eq!(json, "\"final_verification\"");
    }
}
