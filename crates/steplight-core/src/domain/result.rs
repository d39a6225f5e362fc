//! Structured verification and correction results.

use serde::{Deserialize, Serialize};

/// What produced a structured result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Final check of a complete student solution.
    Verification,
    /// Step-by-step correction of a student's attempt.
    Correction,
}

/// Judgement of one student step against the expected step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepJudgement {
    pub student_step: String,
    pub correct_step: String,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl StepJudgement {
    pub fn explanation_text(&self) -> Option<&str> {
        self.explanation
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Ordered per-step judgements plus an optional summary message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResult {
    pub kind: ResultKind,
    #[serde(default)]
    pub steps: Vec<StepJudgement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl StructuredResult {
    /// Whether every judged step is correct. `None` when nothing was judged.
    pub fn all_correct(&self) -> Option<bool> {
        if self.steps.is_empty() {
            None
        } else {
            Some(self.steps.iter().all(|s| s.is_correct))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.summary.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}
