//! `check-config` handler.

use std::path::Path;

use anyhow::Result;

use crate::config::load_settings;
use crate::error::CliError;

/// Validate the settings file and print the effective settings.
pub fn execute(file: Option<&Path>) -> Result<()> {
    let Some(file) = file else {
        return Err(CliError::Arguments("no settings file given; pass FILE or --config".to_string()).into());
    };

    let settings = load_settings(Some(file))?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
