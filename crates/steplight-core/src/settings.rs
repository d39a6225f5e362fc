//! Session settings types and validation.
//!
//! Pure domain types with no infrastructure dependencies. Shells load them
//! from wherever they keep configuration and hand them to the coordinator.

use serde::{Deserialize, Serialize};

/// Default cap on narrated characters.
pub const DEFAULT_NARRATION_MAX_CHARS: usize = 4000;

/// Default number of notices retained for the render state.
pub const DEFAULT_NOTICE_HISTORY: usize = 8;

const NARRATION_MAX_CHARS_RANGE: std::ops::RangeInclusive<usize> = 64..=100_000;
const NOTICE_HISTORY_RANGE: std::ops::RangeInclusive<usize> = 1..=64;

/// How explanation text is prepared before it reaches the audio channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NarrationSettings {
    /// Remove markdown and TeX delimiters before speaking.
    pub strip_markup: bool,

    /// Truncate narrated text at a word boundary past this many characters.
    pub max_chars: Option<usize>,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            strip_markup: true,
            max_chars: Some(DEFAULT_NARRATION_MAX_CHARS),
        }
    }
}

/// Settings for one tutoring session screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Show the sign-in overlay for guests whenever gated content is on
    /// screen, not only after a gated click.
    pub passive_guest_overlay: bool,

    /// Number of recent notices kept in the render state.
    pub notice_history: usize,

    pub narration: NarrationSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            passive_guest_overlay: true,
            notice_history: DEFAULT_NOTICE_HISTORY,
            narration: NarrationSettings::default(),
        }
    }
}

impl SessionSettings {
    /// Merge a partial update, only touching fields that are `Some`.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(passive) = other.passive_guest_overlay {
            self.passive_guest_overlay = passive;
        }
        if let Some(history) = other.notice_history {
            self.notice_history = history;
        }
        if let Some(strip) = other.strip_markup {
            self.narration.strip_markup = strip;
        }
        if let Some(max_chars) = other.narration_max_chars {
            self.narration.max_chars = max_chars;
        }
    }
}

/// Partial settings update.
///
/// `narration_max_chars` is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = remove the cap
/// - `Some(Some(value))` = set the cap
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub passive_guest_overlay: Option<bool>,
    pub notice_history: Option<usize>,
    pub strip_markup: Option<bool>,
    pub narration_max_chars: Option<Option<usize>>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Narration length cap must be between 64 and 100,000 characters, got {0}")]
    InvalidNarrationMaxChars(usize),

    #[error("Notice history must be between 1 and 64, got {0}")]
    InvalidNoticeHistory(usize),
}

/// Validate settings values.
pub fn validate_settings(settings: &SessionSettings) -> Result<(), SettingsError> {
    if let Some(max_chars) = settings.narration.max_chars {
        if !NARRATION_MAX_CHARS_RANGE.contains(&max_chars) {
            return Err(SettingsError::InvalidNarrationMaxChars(max_chars));
        }
    }

    if !NOTICE_HISTORY_RANGE.contains(&settings.notice_history) {
        return Err(SettingsError::InvalidNoticeHistory(settings.notice_history));
    }

    Ok(())
}
