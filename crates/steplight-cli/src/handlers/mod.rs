//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(...) -> anyhow::Result<()>`
//! - Load and validate CLI input, drive the session, format terminal output
//!
//! Session rules live in `steplight-session`; handlers never re-implement them.

pub mod check_config;
pub mod replay;
