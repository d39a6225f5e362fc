//! Content reveal ledger.
//!
//! Unlocked indices always form a contiguous prefix `0..unlocked`, so the
//! ledger stores the prefix length instead of a set. The only index that
//! can be unlocked next is `unlocked` itself.

use std::ops::Range;

use steplight_core::{ContentItem, ContentKind, ItemStatus, NarrationKey, NarrationSource, RevealPayload};

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealLedger {
    kind: ContentKind,
    items: Vec<ContentItem>,
    unlocked: usize,
    current_index: Option<usize>,
}

impl RevealLedger {
    /// A fresh ledger with nothing unlocked.
    pub const fn new(kind: ContentKind, items: Vec<ContentItem>) -> Self {
        Self {
            kind,
            items,
            unlocked: 0,
            current_index: None,
        }
    }

    /// Build a ledger from an upstream payload, trusting its progress echo
    /// only as far as the list reaches.
    pub fn from_payload(payload: RevealPayload) -> Self {
        let unlocked = payload.unlocked_count.min(payload.items.len());
        if unlocked != payload.unlocked_count {
            tracing::warn!(
                reported = payload.unlocked_count,
                len = payload.items.len(),
                "Clamped unlocked count to list length"
            );
        }
        Self {
            kind: payload.kind,
            items: payload.items,
            unlocked,
            current_index: unlocked.checked_sub(1),
        }
    }

    pub const fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&ContentItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn unlocked_count(&self) -> usize {
        self.unlocked
    }

    pub const fn unlocked_indices(&self) -> Range<usize> {
        0..self.unlocked
    }

    pub const fn is_unlocked(&self, index: usize) -> bool {
        index < self.unlocked
    }

    pub const fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The single index that may be unlocked next, if any remain.
    pub fn next_eligible(&self) -> Option<usize> {
        (self.unlocked < self.items.len()).then_some(self.unlocked)
    }

    pub fn status(&self, index: usize) -> ItemStatus {
        if self.is_unlocked(index) {
            ItemStatus::Unlocked
        } else if self.next_eligible() == Some(index) {
            ItemStatus::NextEligible
        } else {
            ItemStatus::Locked
        }
    }

    pub const fn narration_source(&self) -> NarrationSource {
        match self.kind {
            ContentKind::Hints => NarrationSource::Hint,
            ContentKind::Steps => NarrationSource::Step,
        }
    }

    pub const fn narration_key(&self, index: usize) -> NarrationKey {
        NarrationKey::new(self.narration_source(), index)
    }

    /// Check that `index` is the next eligible index without changing state.
    pub fn check_unlock(&self, index: usize) -> Result<(), SessionError> {
        if index != self.unlocked {
            return Err(SessionError::OutOfOrderUnlock {
                requested: index,
                expected: self.unlocked,
            });
        }
        if index >= self.items.len() {
            return Err(SessionError::UnlockOutOfRange {
                requested: index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Unlock `index`, which must be exactly the next eligible index.
    pub fn unlock(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_unlock(index)?;
        self.unlocked += 1;
        self.current_index = Some(index);
        tracing::debug!(kind = self.kind.as_str(), index, "Unlocked item");
        Ok(())
    }

    /// Undo the unlock of `index` after its follow-up request failed.
    ///
    /// Only the most recent unlock can be reverted; anything else is ignored
    /// and reported as `false`.
    pub fn revert_unlock(&mut self, index: usize) -> bool {
        if self.unlocked == 0 || index != self.unlocked - 1 {
            return false;
        }
        self.unlocked -= 1;
        self.current_index = index.checked_sub(1);
        tracing::debug!(kind = self.kind.as_str(), index, "Reverted unlock");
        true
    }

    /// Plain text of every unlocked item, one per line.
    pub fn unlocked_text(&self) -> String {
        self.items[self.unlocked_indices()]
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item.text.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
