//! Read-only render state handed to the UI shell.
//!
//! Every field is derived by the coordinator from its owned entities plus
//! the in-flight flag; the shell never mutates it. These are wire shapes
//! (camelCase JSON) so that desktop and web shells can share them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ActionId, ActiveItem, ContentKind, NarrationKey, ResultKind, StepJudgement};

/// Which of the three mutually exclusive panel states is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    /// A request is in flight and nothing is displayable yet.
    Loading,
    /// Idle, nothing requested.
    Empty,
    /// Exactly one response shape is rendered.
    Populated,
}

/// Why the sign-in overlay is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum OverlayReason {
    /// A guest invoked a gated action.
    PendingAction { action: ActionId },
    /// The content on screen is itself gated for guests.
    GatedContent,
}

/// Presentation status of one reveal-list index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Rendered fully.
    Unlocked,
    /// Rendered as an "Unlock N" affordance.
    NextEligible,
    /// Rendered as a disabled placeholder.
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub index: usize,
    pub status: ItemStatus,
    /// Only populated for unlocked items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub has_explanation: bool,
    pub expanded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgementView {
    pub index: usize,
    pub judgement: StepJudgement,
    pub expanded: bool,
}

/// Contents of a populated panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PanelContents {
    ActiveItemDetail {
        item: ActiveItem,
        expanded: bool,
    },
    RevealList {
        kind: ContentKind,
        items: Vec<ItemView>,
        #[serde(rename = "currentIndex")]
        current_index: Option<usize>,
    },
    StructuredResult {
        kind: ResultKind,
        steps: Vec<JudgementView>,
        summary: Option<String>,
        #[serde(rename = "allCorrect")]
        all_correct: Option<bool>,
    },
    StreamingText {
        text: String,
        streaming: bool,
    },
    Error {
        message: String,
    },
}

/// Enabled/selected flags of one control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlState {
    pub enabled: bool,
    pub selected: bool,
}

impl ControlState {
    pub const fn new(enabled: bool, selected: bool) -> Self {
        Self { enabled, selected }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub hint: ControlState,
    pub next_step: ControlState,
    pub final_verification: ControlState,
    pub copy: ControlState,
    pub like: ControlState,
    pub dislike: ControlState,
    pub mute: ControlState,
    pub play_pause: ControlState,
}

/// Category of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCategory {
    /// Rejected synchronously by a guard; nothing changed.
    Guarded,
    /// A local resource was unavailable (nothing to copy, clipboard refused).
    Resource,
    /// The upstream producer or audio channel failed.
    Upstream,
}

/// Transient, non-blocking message explaining why an action did not proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub category: NoticeCategory,
    pub action: Option<ActionId>,
    pub message: String,
    pub issued_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(category: NoticeCategory, action: Option<ActionId>, message: impl Into<String>) -> Self {
        Self {
            category,
            action,
            message: message.into(),
            issued_at: Utc::now(),
        }
    }
}

/// Complete render state of one tutoring screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    pub panel: PanelState,
    pub contents: Option<PanelContents>,
    pub overlay: Option<OverlayReason>,
    pub pending_action: Option<ActionId>,
    pub active_narration: Option<NarrationKey>,
    pub in_flight: Option<ActionId>,
    pub current_action: Option<ActionId>,
    pub controls: Controls,
    /// Recent notices, oldest first.
    pub notices: Vec<Notice>,
}

impl RenderState {
    pub const fn overlay_visible(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Reveal-list item views, if a reveal list is on screen.
    pub fn reveal_items(&self) -> Option<&[ItemView]> {
        match &self.contents {
            Some(PanelContents::RevealList { items, .. }) => Some(items),
            _ => None,
        }
    }
}
