//! Response presenter - owns the single on-screen response shape.
//!
//! Replacing the shape always clears per-item expansion flags and reactions.
//! Releasing the narration lock is the coordinator's half of that switch,
//! because only it may talk to the audio channel.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use steplight_core::{
    ActiveItem, ContentKind, NarrationKey, NarrationSource, ResponseShape, ShapeKind, StructuredResult,
};

use crate::error::SessionError;
use crate::ledger::RevealLedger;

/// The shape currently on screen, with the state each shape carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    ActiveItemDetail(ActiveItem),
    RevealList(RevealLedger),
    StructuredResult(StructuredResult),
    StreamingText { text: String, complete: bool },
    Error(String),
}

impl From<ResponseShape> for Presentation {
    fn from(shape: ResponseShape) -> Self {
        match shape {
            ResponseShape::ActiveItemDetail(item) => Self::ActiveItemDetail(item),
            ResponseShape::RevealList(payload) => Self::RevealList(RevealLedger::from_payload(payload)),
            ResponseShape::StructuredResult(result) => Self::StructuredResult(result),
            ResponseShape::StreamingText(text) => Self::StreamingText {
                text,
                complete: true,
            },
            ResponseShape::Error(message) => Self::Error(message),
        }
    }
}

impl Presentation {
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::ActiveItemDetail(_) => ShapeKind::ActiveItemDetail,
            Self::RevealList(_) => ShapeKind::RevealList,
            Self::StructuredResult(_) => ShapeKind::StructuredResult,
            Self::StreamingText { .. } => ShapeKind::StreamingText,
            Self::Error(_) => ShapeKind::Error,
        }
    }

    /// Content a guest may only see behind the sign-in overlay.
    pub fn is_gated_content(&self) -> bool {
        match self {
            Self::StructuredResult(_) => true,
            Self::RevealList(ledger) => ledger.kind() == ContentKind::Steps,
            _ => false,
        }
    }

    /// Plain text of what the viewer can currently read.
    ///
    /// Locked reveal items never leak into it.
    pub fn plain_text(&self) -> String {
        match self {
            Self::ActiveItemDetail(active) => active.item.text.trim().to_string(),
            Self::RevealList(ledger) => ledger.unlocked_text(),
            Self::StructuredResult(result) => {
                let mut lines: Vec<String> = result
                    .steps
                    .iter()
                    .enumerate()
                    .map(|(i, step)| {
                        let mark = if step.is_correct { "correct" } else { "incorrect" };
                        format!("{}. {} ({mark})", i + 1, step.student_step.trim())
                    })
                    .collect();
                if let Some(summary) = result.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                    lines.push(summary.to_string());
                }
                lines.join("\n")
            }
            Self::StreamingText { text, .. } => text.trim().to_string(),
            Self::Error(message) => message.trim().to_string(),
        }
    }
}

/// Where an explanation toggle points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ExplanationTarget {
    /// An item of the on-screen reveal list.
    RevealItem { index: usize },
    /// A judged step of the on-screen structured result.
    ResultStep { index: usize },
    /// The focused item of an active-item detail.
    ActiveItem,
}

/// Resolved explanation toggle target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationSlot<'a> {
    pub key: NarrationKey,
    /// Index into the expansion set.
    pub slot: usize,
    /// Explanation text, `None` when the item has none.
    pub text: Option<&'a str>,
}

/// Copy / like / dislike flags of the presented response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reactions {
    pub copied: bool,
    pub liked: bool,
    pub disliked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ResponsePresenter {
    current: Option<Presentation>,
    expanded: BTreeSet<usize>,
    reactions: Reactions,
}

impl ResponsePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn current(&self) -> Option<&Presentation> {
        self.current.as_ref()
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        self.current.as_ref().map(Presentation::kind)
    }

    pub const fn reactions(&self) -> Reactions {
        self.reactions
    }

    pub const fn ledger(&self) -> Option<&RevealLedger> {
        match &self.current {
            Some(Presentation::RevealList(ledger)) => Some(ledger),
            _ => None,
        }
    }

    pub fn ledger_mut(&mut self) -> Option<&mut RevealLedger> {
        match &mut self.current {
            Some(Presentation::RevealList(ledger)) => Some(ledger),
            _ => None,
        }
    }

    /// Replace whatever is on screen. Returns the kind that was replaced.
    pub fn replace(&mut self, next: Option<Presentation>) -> Option<ShapeKind> {
        let previous = self.kind();
        if previous.is_some() || next.is_some() {
            tracing::debug!(?previous, next = ?next.as_ref().map(Presentation::kind), "Presentation replaced");
        }
        self.current = next;
        self.expanded.clear();
        self.reactions = Reactions::default();
        previous
    }

    /// Append a streamed delta.
    ///
    /// An open streaming shape grows in place and `false` is returned. Any
    /// other state is replaced by a new open stream and `true` is returned.
    pub fn append_stream(&mut self, delta: &str) -> bool {
        if let Some(Presentation::StreamingText {
            text,
            complete: false,
        }) = &mut self.current
        {
            text.push_str(delta);
            return false;
        }

        self.replace(Some(Presentation::StreamingText {
            text: delta.to_string(),
            complete: false,
        }));
        true
    }

    /// Mark an open stream complete.
    pub fn finish_stream(&mut self) {
        if let Some(Presentation::StreamingText { complete, .. }) = &mut self.current {
            *complete = true;
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(
            self.current,
            Some(Presentation::StreamingText {
                complete: false,
                ..
            })
        )
    }

    /// Whether there is anything on screen worth rendering as populated.
    pub fn has_displayable_content(&self) -> bool {
        match &self.current {
            None => false,
            Some(Presentation::StreamingText { text, .. }) => !text.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Text handed to the clipboard by the copy action.
    pub fn copy_text(&self) -> Result<String, SessionError> {
        self.current
            .as_ref()
            .map(Presentation::plain_text)
            .filter(|text| !text.is_empty())
            .ok_or(SessionError::NothingToCopy)
    }

    pub fn is_expanded(&self, slot: usize) -> bool {
        self.expanded.contains(&slot)
    }

    pub fn set_expanded(&mut self, slot: usize, expanded: bool) {
        if expanded {
            self.expanded.insert(slot);
        } else {
            self.expanded.remove(&slot);
        }
    }

    /// Resolve an explanation toggle against what is on screen.
    ///
    /// Locked reveal items and indices outside the shape are unavailable.
    pub fn explanation(&self, target: ExplanationTarget) -> Result<ExplanationSlot<'_>, SessionError> {
        match (target, &self.current) {
            (ExplanationTarget::RevealItem { index }, Some(Presentation::RevealList(ledger))) => {
                let item = ledger
                    .item(index)
                    .filter(|_| ledger.is_unlocked(index))
                    .ok_or(SessionError::TargetUnavailable)?;
                Ok(ExplanationSlot {
                    key: ledger.narration_key(index),
                    slot: index,
                    text: item.explanation_text(),
                })
            }
            (ExplanationTarget::ResultStep { index }, Some(Presentation::StructuredResult(result))) => {
                let step = result.steps.get(index).ok_or(SessionError::TargetUnavailable)?;
                Ok(ExplanationSlot {
                    key: NarrationKey::new(NarrationSource::Result, index),
                    slot: index,
                    text: step.explanation_text(),
                })
            }
            (ExplanationTarget::ActiveItem, Some(Presentation::ActiveItemDetail(active))) => Ok(ExplanationSlot {
                key: NarrationKey::new(NarrationSource::Detail, active.index),
                slot: active.index,
                text: active.item.explanation_text(),
            }),
            _ => Err(SessionError::TargetUnavailable),
        }
    }

    /// Toggle a reaction, keeping like and dislike mutually exclusive.
    /// Returns the new value of the toggled flag.
    pub fn toggle_like(&mut self) -> bool {
        self.reactions.liked = !self.reactions.liked;
        if self.reactions.liked {
            self.reactions.disliked = false;
        }
        self.reactions.liked
    }

    pub fn toggle_dislike(&mut self) -> bool {
        self.reactions.disliked = !self.reactions.disliked;
        if self.reactions.disliked {
            self.reactions.liked = false;
        }
        self.reactions.disliked
    }

    pub fn mark_copied(&mut self) {
        self.reactions.copied = true;
    }
}
