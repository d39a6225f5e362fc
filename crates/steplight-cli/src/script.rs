//! Replay scripts.
//!
//! A script is a JSON document describing a tutoring session step by step:
//!
//! ```json
//! {
//!   "authenticated": true,
//!   "steps": [
//!     { "step": "respond", "payload": { "reveal": { "kind": "hints", "items": [{ "text": "Isolate x" }] } } },
//!     { "step": "dispatch", "action": { "type": "request_hint" } },
//!     { "step": "dispatch", "action": { "type": "unlock", "index": 0 } },
//!     { "step": "channel", "status": { "isPlaying": true } }
//!   ]
//! }
//! ```
//!
//! `respond`, `stream` and `fail` queue the producer's answer to the next
//! request; the other steps act on the session directly.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use steplight_core::{ChannelStatus, ProducerPayload, RevealPayload, StreamEvent};
use steplight_session::Action;

use crate::error::CliError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Whether the viewer starts signed in.
    #[serde(default)]
    pub authenticated: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Queue a complete producer reply.
    Respond { payload: ProducerPayload },
    /// Queue a streamed producer reply.
    Stream { events: Vec<StreamEvent> },
    /// Queue a producer failure.
    Fail { message: String },
    /// Dispatch a user action.
    Dispatch { action: Action },
    /// Change the viewer's sign-in state.
    Auth { authenticated: bool },
    /// Push an audio channel status.
    Channel {
        #[serde(default)]
        status: ChannelStatus,
    },
    /// Put a reveal list on screen directly.
    Reset { reveal: RevealPayload },
}

impl Step {
    /// Short description for summaries.
    pub fn label(&self) -> String {
        match self {
            Self::Respond { .. } => "respond".to_string(),
            Self::Stream { events } => format!("stream ({} events)", events.len()),
            Self::Fail { .. } => "fail".to_string(),
            Self::Dispatch { action } => format!("dispatch {}", action_label(action)),
            Self::Auth { authenticated } => format!("auth {}", if *authenticated { "signed in" } else { "guest" }),
            Self::Channel { status } => format!(
                "channel playing={} paused={} muted={}",
                status.is_playing, status.is_paused, status.is_muted
            ),
            Self::Reset { reveal } => format!("reset {} ({} items)", reveal.kind.as_str(), reveal.items.len()),
        }
    }
}

fn action_label(action: &Action) -> String {
    match action {
        Action::RequestHint { .. } => "request_hint".to_string(),
        Action::RequestNextStep { .. } => "request_next_step".to_string(),
        Action::RequestFinalVerification { .. } => "request_final_verification".to_string(),
        Action::Unlock { index } => format!("unlock {index}"),
        Action::ToggleExplanation { target } => format!("toggle_explanation {target:?}"),
        Action::Copy => "copy".to_string(),
        Action::Like => "like".to_string(),
        Action::Dislike => "dislike".to_string(),
        Action::ToggleMute => "toggle_mute".to_string(),
        Action::TogglePlay => "toggle_play".to_string(),
        Action::SignIn => "sign_in".to_string(),
        Action::DismissSignIn => "dismiss_sign_in".to_string(),
    }
}

pub fn parse_script(raw: &str) -> Result<Script, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Script(e.to_string()))
}

pub fn load_script(path: &Path) -> Result<Script, CliError> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let script = parse_script(&raw)?;
    tracing::debug!(path = %path.display(), steps = script.steps.len(), "Script loaded");
    Ok(script)
}
