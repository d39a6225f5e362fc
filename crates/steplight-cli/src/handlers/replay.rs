//! `replay` handler: drive a coordinator through a script.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use steplight_core::{
    Collaborators, MemoryClipboard, PanelContents, PanelState, RenderState, SessionSettings,
    StaticAuthState,
};
use steplight_session::{Coordinator, DispatchOutcome};

use crate::adapters::{ScriptedProducer, ScriptedReply, TracingAudioChannel};
use crate::error::CliError;
use crate::script::{Script, Step, load_script};

/// Render state after one script step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub index: usize,
    pub label: String,
    /// Outcome of a dispatch step; `None` for every other step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    pub state: RenderState,
}

/// Replay `script` and collect a report per step.
///
/// `authenticated` signs the viewer in even when the script starts as a
/// guest.
pub async fn run(script: Script, settings: SessionSettings, authenticated: bool) -> Result<Vec<StepReport>, CliError> {
    let producer = Arc::new(ScriptedProducer::new());
    let auth = Arc::new(StaticAuthState::new(authenticated || script.authenticated));
    let ports = Collaborators::new(
        producer.clone(),
        Arc::new(TracingAudioChannel::new()),
        auth.clone(),
        Arc::new(MemoryClipboard::new()),
    );
    let mut coordinator = Coordinator::new(ports, settings)?;

    let mut reports = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.into_iter().enumerate() {
        let label = step.label();
        tracing::debug!(index, %label, "Replay step");

        let outcome = match step {
            Step::Respond { payload } => {
                producer.enqueue(ScriptedReply::Complete(payload));
                None
            }
            Step::Stream { events } => {
                producer.enqueue(ScriptedReply::Stream(events));
                None
            }
            Step::Fail { message } => {
                producer.enqueue(ScriptedReply::Fail(message));
                None
            }
            Step::Dispatch { action } => Some(describe(&coordinator.dispatch(action).await)),
            Step::Auth { authenticated } => {
                auth.set_authenticated(authenticated);
                coordinator.on_auth_changed();
                None
            }
            Step::Channel { status } => {
                coordinator.on_channel_status(status);
                None
            }
            Step::Reset { reveal } => {
                coordinator.reset_ledger(reveal);
                None
            }
        };

        reports.push(StepReport {
            index,
            label,
            outcome,
            state: coordinator.render(),
        });
    }

    coordinator.close();
    Ok(reports)
}

pub fn describe(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Applied => "applied".to_string(),
        DispatchOutcome::Suspended { action } => format!("suspended {}", action.as_str()),
        DispatchOutcome::Rejected(err) => format!("rejected: {err}"),
    }
}

/// One-line human summary of a step report.
pub fn summarize(report: &StepReport) -> String {
    let state = &report.state;
    let mut line = format!("[{}] {}", report.index, report.label);

    if let Some(outcome) = &report.outcome {
        let _ = write!(line, " -> {outcome}");
    }

    match (&state.panel, &state.contents) {
        (PanelState::Loading, _) => line.push_str(" | loading"),
        (PanelState::Empty, _) | (PanelState::Populated, None) => line.push_str(" | empty"),
        (PanelState::Populated, Some(contents)) => {
            let _ = write!(line, " | {}", describe_contents(contents));
        }
    }

    if let Some(key) = state.active_narration {
        let _ = write!(line, " | narrating {key}");
    }
    if let Some(overlay) = &state.overlay {
        let _ = write!(line, " | overlay {overlay:?}");
    }
    if let Some(notice) = state.latest_notice() {
        let _ = write!(line, " | notice: {}", notice.message);
    }
    line
}

fn describe_contents(contents: &PanelContents) -> String {
    match contents {
        PanelContents::ActiveItemDetail { item, expanded } => format!(
            "{} {} detail{}",
            item.kind.as_str(),
            item.index + 1,
            if *expanded { " (expanded)" } else { "" }
        ),
        PanelContents::RevealList { kind, items, .. } => {
            let unlocked = items.iter().filter(|item| item.text.is_some()).count();
            format!("{} {unlocked}/{} unlocked", kind.as_str(), items.len())
        }
        PanelContents::StructuredResult { steps, all_correct, .. } => match all_correct {
            Some(true) => format!("result: {} steps, all correct", steps.len()),
            Some(false) => format!("result: {} steps, some incorrect", steps.len()),
            None => "result: no steps".to_string(),
        },
        PanelContents::StreamingText { text, streaming } => {
            format!("text ({} chars{})", text.chars().count(), if *streaming { ", streaming" } else { "" })
        }
        PanelContents::Error { message } => format!("error: {message}"),
    }
}

/// Load, replay, and print a script.
pub async fn execute(path: &Path, settings: SessionSettings, authenticated: bool, json: bool) -> Result<()> {
    let script = load_script(path)?;
    let reports = run(script, settings, authenticated).await?;

    for report in &reports {
        if json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            println!("{}", summarize(report));
        }
    }
    Ok(())
}
