//! Hint and step items produced by the upstream tutor.

use serde::{Deserialize, Serialize};

/// Which kind of reveal sequence a list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Hints,
    Steps,
}

impl ContentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hints => "hints",
            Self::Steps => "steps",
        }
    }
}

/// A single hint or step, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Text shown once the item is unlocked.
    pub text: String,

    /// Optional longer explanation that can be expanded and narrated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl ContentItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Explanation text, if present and not blank.
    pub fn explanation_text(&self) -> Option<&str> {
        self.explanation
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}
