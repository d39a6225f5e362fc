//! Response shapes and the precedence used to pick one from an upstream payload.
//!
//! Upstream replies are loosely populated: several fields may be present at
//! once. [`ResponseShape::select`] turns a payload into exactly one shape
//! using the fixed precedence
//!
//! ```text
//! ActiveItemDetail > RevealList > StructuredResult > StreamingText
//! ```
//!
//! Fields that are present but empty never win.

use serde::{Deserialize, Serialize};

use super::content::{ContentItem, ContentKind};
use super::result::StructuredResult;

/// A single focused item with its position in the sequence it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveItem {
    pub kind: ContentKind,
    #[serde(default)]
    pub index: usize,
    pub item: ContentItem,
}

/// An ordered reveal sequence as sent by the producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealPayload {
    pub kind: ContentKind,
    #[serde(default)]
    pub items: Vec<ContentItem>,
    /// Length of the already-unlocked prefix, as tracked upstream.
    #[serde(default)]
    pub unlocked_count: usize,
}

/// Raw upstream reply with independently optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProducerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_item: Option<ActiveItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal: Option<RevealPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ProducerPayload {
    pub fn reveal(kind: ContentKind, items: Vec<ContentItem>) -> Self {
        Self {
            reveal: Some(RevealPayload {
                kind,
                items,
                unlocked_count: 0,
            }),
            ..Self::default()
        }
    }

    pub fn structured(result: StructuredResult) -> Self {
        Self {
            structured: Some(result),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Discriminant of a [`ResponseShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    ActiveItemDetail,
    RevealList,
    StructuredResult,
    StreamingText,
    Error,
}

/// Exactly one authoritative response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ResponseShape {
    ActiveItemDetail(ActiveItem),
    RevealList(RevealPayload),
    StructuredResult(StructuredResult),
    StreamingText(String),
    /// Upstream failure, presented like any other shape.
    Error(String),
}

impl ResponseShape {
    /// Pick the authoritative shape from a payload, or `None` if nothing in
    /// it is displayable.
    pub fn select(payload: ProducerPayload) -> Option<Self> {
        let ProducerPayload {
            active_item,
            reveal,
            structured,
            text,
        } = payload;

        if let Some(active) = active_item.filter(|a| !a.item.text.trim().is_empty()) {
            return Some(Self::ActiveItemDetail(active));
        }
        if let Some(reveal) = reveal.filter(|r| !r.items.is_empty()) {
            return Some(Self::RevealList(reveal));
        }
        if let Some(result) = structured.filter(|r| !r.is_empty()) {
            return Some(Self::StructuredResult(result));
        }
        text.filter(|t| !t.trim().is_empty())
            .map(Self::StreamingText)
    }

    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::ActiveItemDetail(_) => ShapeKind::ActiveItemDetail,
            Self::RevealList(_) => ShapeKind::RevealList,
            Self::StructuredResult(_) => ShapeKind::StructuredResult,
            Self::StreamingText(_) => ShapeKind::StreamingText,
            Self::Error(_) => ShapeKind::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ResultKind, StepJudgement};

    fn verification() -> StructuredResult {
        StructuredResult {
            kind: ResultKind::Verification,
            steps: vec![StepJudgement {
                student_step: "2x = 4".into(),
                correct_step: "2x = 4".into(),
                is_correct: true,
                explanation: None,
            }],
            summary: None,
        }
    }

    #[test]
    fn active_item_beats_every_other_field() {
        let payload = ProducerPayload {
            active_item: Some(ActiveItem {
                kind: ContentKind::Steps,
                index: 1,
                item: ContentItem::new("Subtract 3"),
            }),
            reveal: Some(RevealPayload {
                kind: ContentKind::Steps,
                items: vec![ContentItem::new("a")],
                unlocked_count: 0,
            }),
            structured: Some(verification()),
            text: Some("streamed".into()),
        };
        let shape = ResponseShape::select(payload).unwrap();
        assert_eq!(shape.kind(), ShapeKind::ActiveItemDetail);
    }

    #[test]
    fn structured_beats_text_but_not_reveal() {
        let mut payload = ProducerPayload::structured(verification());
        payload.text = Some("hello".into());
        assert_eq!(
            ResponseShape::select(payload.clone()).map(|s| s.kind()),
            Some(ShapeKind::StructuredResult)
        );

        payload.reveal = Some(RevealPayload {
            kind: ContentKind::Hints,
            items: vec![ContentItem::new("h0")],
            unlocked_count: 0,
        });
        assert_eq!(
            ResponseShape::select(payload).map(|s| s.kind()),
            Some(ShapeKind::RevealList)
        );
    }

    #[test]
    fn empty_fields_never_win() {
        let payload = ProducerPayload {
            reveal: Some(RevealPayload {
                kind: ContentKind::Hints,
                items: vec![],
                unlocked_count: 0,
            }),
            text: Some("fallback".into()),
            ..ProducerPayload::default()
        };
        assert_eq!(
            ResponseShape::select(payload),
            Some(ResponseShape::StreamingText("fallback".into()))
        );
        assert_eq!(ResponseShape::select(ProducerPayload::text("  ")), None);
        assert_eq!(ResponseShape::select(ProducerPayload::default()), None);
    }

    #[test]
    fn payload_parses_camel_case_wire_shape() {
        let json = r#"{
            "reveal": {
                "kind": "steps",
                "items": [{"text": "Isolate x", "explanation": "Move constants"}],
                "unlockedCount": 1
            }
        }"#;
        let payload: ProducerPayload = serde_json::from_str(json).unwrap();
        let reveal = payload.reveal.unwrap();
        assert_eq!(reveal.kind, ContentKind::Steps);
        assert_eq!(reveal.unlocked_count, 1);
        assert_eq!(reveal.items[0].explanation.as_deref(), Some("Move constants"));
    }
}
