//! Namespaced keys identifying which explanation owns the narration channel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The UI element family an explanation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationSource {
    /// An item of a hint reveal list.
    Hint,
    /// An item of a step reveal list.
    Step,
    /// A judged step of a verification/correction result.
    Result,
    /// The single focused item of an active-item detail.
    Detail,
}

impl NarrationSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hint => "hint",
            Self::Step => "step",
            Self::Result => "result",
            Self::Detail => "detail",
        }
    }
}

/// `{source}_{index}` key, e.g. `hint_0`.
///
/// Serialized in its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NarrationKey {
    pub source: NarrationSource,
    pub index: usize,
}

impl NarrationKey {
    pub const fn new(source: NarrationSource, index: usize) -> Self {
        Self { source, index }
    }

    /// Parse a `{source}_{index}` string.
    pub fn parse(s: &str) -> Option<Self> {
        let (source, index) = s.rsplit_once('_')?;
        let source = match source {
            "hint" => NarrationSource::Hint,
            "step" => NarrationSource::Step,
            "result" => NarrationSource::Result,
            "detail" => NarrationSource::Detail,
            _ => return None,
        };
        Some(Self::new(source, index.parse().ok()?))
    }
}

impl fmt::Display for NarrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.source.as_str(), self.index)
    }
}

impl From<NarrationKey> for String {
    fn from(key: NarrationKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for NarrationKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid narration key: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats_as_source_underscore_index() {
        let key = NarrationKey::new(NarrationSource::Hint, 0);
        assert_eq!(key.to_string(), "hint_0");
        assert_eq!(NarrationKey::new(NarrationSource::Result, 12).to_string(), "result_12");
    }

    #[test]
    fn parse_accepts_known_sources_only() {
        assert_eq!(
            NarrationKey::parse("step_3"),
            Some(NarrationKey::new(NarrationSource::Step, 3))
        );
        assert_eq!(NarrationKey::parse("video_1"), None);
        assert_eq!(NarrationKey::parse("hint_x"), None);
        assert_eq!(NarrationKey::parse("hint"), None);
    }

    #[test]
    fn serializes_as_string() {
        let key = NarrationKey::new(NarrationSource::Detail, 2);
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"detail_2\"");
        let back: NarrationKey = serde_json::from_str("\"detail_2\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<NarrationKey>("\"nope\"").is_err());
    }
}
