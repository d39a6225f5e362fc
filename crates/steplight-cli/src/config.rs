//! Settings loading for CLI commands.
//!
//! Settings come from an optional JSON file, then command-line overrides
//! are merged on top. Both stages are validated.

use std::fs;
use std::path::Path;

use steplight_core::{SessionSettings, SettingsUpdate, validate_settings};

use crate::error::CliError;

/// Load settings from `path`, or defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<SessionSettings, CliError> {
    let settings = match path {
        None => SessionSettings::default(),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            serde_json::from_str(&raw)
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?
        }
    };

    validate_settings(&settings)?;
    tracing::debug!(?settings, "Settings loaded");
    Ok(settings)
}

/// Merge command-line overrides into loaded settings.
pub fn apply_overrides(
    mut settings: SessionSettings,
    update: &SettingsUpdate,
) -> Result<SessionSettings, CliError> {
    settings.merge(update);
    validate_settings(&settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_means_defaults() {
        assert_eq!(load_settings(None).unwrap(), SessionSettings::default());
    }

    #[test]
    fn overrides_are_validated() {
        let update = SettingsUpdate {
            notice_history: Some(0),
            ..SettingsUpdate::default()
        };
        let err = apply_overrides(SessionSettings::default(), &update).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));

        let update = SettingsUpdate {
            passive_guest_overlay: Some(false),
            narration_max_chars: Some(None),
            ..SettingsUpdate::default()
        };
        let settings = apply_overrides(SessionSettings::default(), &update).unwrap();
        assert!(!settings.passive_guest_overlay);
        assert_eq!(settings.narration.max_chars, None);
    }
}
