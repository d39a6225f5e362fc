//! User actions accepted by the coordinator and their outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use steplight_core::{ActionId, ContentKind};

use crate::error::SessionError;
use crate::presenter::ExplanationTarget;

/// One user-triggered action.
///
/// # Wire Format
///
/// ```json
/// { "type": "unlock", "index": 1 }
/// { "type": "toggle_explanation", "target": "reveal_item", "index": 0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    RequestHint {
        #[serde(default)]
        payload: Value,
    },
    RequestNextStep {
        #[serde(default)]
        payload: Value,
    },
    RequestFinalVerification {
        #[serde(default)]
        payload: Value,
    },
    /// Reveal the next item of the on-screen list.
    Unlock { index: usize },
    ToggleExplanation {
        #[serde(flatten)]
        target: ExplanationTarget,
    },
    Copy,
    Like,
    Dislike,
    ToggleMute,
    TogglePlay,
    SignIn,
    DismissSignIn,
}

impl Action {
    /// Stable id of this action. Unlocking depends on the list on screen:
    /// a step unlock is the gated `next_step` action.
    pub const fn id(&self, list: Option<ContentKind>) -> ActionId {
        match self {
            Self::RequestHint { .. } => ActionId::Hint,
            Self::RequestNextStep { .. } => ActionId::NextStep,
            Self::RequestFinalVerification { .. } => ActionId::FinalVerification,
            Self::Unlock { .. } => match list {
                Some(ContentKind::Steps) => ActionId::NextStep,
                _ => ActionId::UnlockHint,
            },
            Self::ToggleExplanation { .. } => ActionId::ToggleExplanation,
            Self::Copy => ActionId::Copy,
            Self::Like => ActionId::Like,
            Self::Dislike => ActionId::Dislike,
            Self::ToggleMute => ActionId::ToggleMute,
            Self::TogglePlay => ActionId::TogglePlay,
            Self::SignIn => ActionId::SignIn,
            Self::DismissSignIn => ActionId::DismissSignIn,
        }
    }

    pub const fn is_producer_bound(&self) -> bool {
        self.id(None).is_producer_bound()
    }
}

/// What happened to a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The action took effect.
    Applied,
    /// A guest hit the gate; the action is pending behind the overlay.
    Suspended { action: ActionId },
    /// The action was refused or failed; a notice explains why.
    Rejected(SessionError),
}

impl DispatchOutcome {
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub const fn error(&self) -> Option<&SessionError> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_id_depends_on_list_kind() {
        let unlock = Action::Unlock { index: 0 };
        assert_eq!(unlock.id(Some(ContentKind::Steps)), ActionId::NextStep);
        assert_eq!(unlock.id(Some(ContentKind::Hints)), ActionId::UnlockHint);
        assert_eq!(unlock.id(None), ActionId::UnlockHint);
    }

    #[test]
    fn actions_parse_from_tagged_json() {
        let action: Action =
            serde_json::from_str(r#"{"type":"toggle_explanation","target":"reveal_item","index":2}"#)
                .unwrap();
        assert_eq!(
            action,
            Action::ToggleExplanation {
                target: ExplanationTarget::RevealItem { index: 2 }
            }
        );

        let action: Action = serde_json::from_str(r#"{"type":"request_hint"}"#).unwrap();
        assert_eq!(action, Action::RequestHint { payload: Value::Null });
        assert!(action.is_producer_bound());
    }
}
