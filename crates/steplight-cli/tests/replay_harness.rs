//! End-to-end replay of scripted sessions through the CLI harness.

use std::io::Write;

use steplight_cli::config::load_settings;
use steplight_cli::handlers::replay::{StepReport, run, summarize};
use steplight_cli::script::{load_script, parse_script};
use steplight_cli::CliError;
use steplight_core::{
    ItemStatus, NarrationKey, NarrationSource, NoticeCategory, OverlayReason, PanelContents,
    PanelState, SessionSettings,
};

const HINT_SESSION: &str = r#"{
    "authenticated": true,
    "steps": [
        { "step": "respond", "payload": { "reveal": { "kind": "hints", "items": [
            { "text": "Isolate x", "explanation": "Move **constants** to the right." },
            { "text": "Divide both sides", "explanation": "$\\frac{x}{2}$ becomes x." },
            { "text": "Check the answer" }
        ] } } },
        { "step": "dispatch", "action": { "type": "request_hint" } },
        { "step": "dispatch", "action": { "type": "unlock", "index": 1 } },
        { "step": "dispatch", "action": { "type": "unlock", "index": 0 } },
        { "step": "dispatch", "action": { "type": "toggle_explanation", "target": "reveal_item", "index": 0 } },
        { "step": "channel", "status": { "isPlaying": true } },
        { "step": "dispatch", "action": { "type": "unlock", "index": 1 } },
        { "step": "dispatch", "action": { "type": "toggle_explanation", "target": "reveal_item", "index": 1 } },
        { "step": "channel", "status": {} }
    ]
}"#;

fn replay(raw: &str, settings: SessionSettings, authenticated: bool) -> Vec<StepReport> {
    let script = parse_script(raw).unwrap();
    tokio_test::block_on(run(script, settings, authenticated)).unwrap()
}

fn hint(index: usize) -> NarrationKey {
    NarrationKey::new(NarrationSource::Hint, index)
}

#[test]
fn hint_session_unlocks_in_order_and_narrates_one_at_a_time() {
    let reports = replay(HINT_SESSION, SessionSettings::default(), false);
    assert_eq!(reports.len(), 9);

    // Hint list arrives with nothing unlocked.
    let items = reports[1].state.reveal_items().unwrap();
    assert_eq!(items[0].status, ItemStatus::NextEligible);
    assert_eq!(items[1].status, ItemStatus::Locked);

    // Skipping ahead is refused with a guarded notice.
    assert!(reports[2].outcome.as_deref().unwrap().starts_with("rejected"));
    let notice = reports[2].state.latest_notice().unwrap();
    assert_eq!(notice.category, NoticeCategory::Guarded);

    assert_eq!(reports[3].outcome.as_deref(), Some("applied"));
    assert_eq!(reports[3].state.reveal_items().unwrap()[0].status, ItemStatus::Unlocked);

    assert_eq!(reports[4].state.active_narration, Some(hint(0)));
    assert!(reports[5].state.controls.play_pause.enabled);

    // Second item unlocks but cannot narrate while the first still owns audio.
    assert_eq!(reports[6].outcome.as_deref(), Some("applied"));
    assert!(reports[7].outcome.as_deref().unwrap().starts_with("rejected"));
    assert_eq!(reports[7].state.active_narration, Some(hint(0)));

    // Playback drained; narration is released.
    assert_eq!(reports[8].state.active_narration, None);
}

#[test]
fn guest_gated_click_suspends_until_sign_in() {
    let script = r#"{
        "steps": [
            { "step": "dispatch", "action": { "type": "request_next_step" } },
            { "step": "auth", "authenticated": true },
            { "step": "dispatch", "action": { "type": "request_next_step" } }
        ]
    }"#;
    let reports = replay(script, SessionSettings::default(), false);

    assert_eq!(reports[0].outcome.as_deref(), Some("suspended next_step"));
    assert_eq!(
        reports[0].state.overlay,
        Some(OverlayReason::PendingAction { action: steplight_core::ActionId::NextStep })
    );
    assert_eq!(reports[1].state.overlay, None);
    assert_eq!(reports[2].outcome.as_deref(), Some("applied"));
}

#[test]
fn authenticated_flag_overrides_a_guest_script() {
    let script = r#"{ "steps": [{ "step": "dispatch", "action": { "type": "request_final_verification" } }] }"#;
    let reports = replay(script, SessionSettings::default(), true);
    assert_eq!(reports[0].outcome.as_deref(), Some("applied"));
}

#[test]
fn streamed_reply_and_upstream_failure() {
    let script = r#"{
        "authenticated": true,
        "steps": [
            { "step": "stream", "events": [
                { "type": "delta", "data": "Let x " },
                { "type": "delta", "data": "be 4." },
                { "type": "done", "data": null }
            ] },
            { "step": "dispatch", "action": { "type": "request_hint" } },
            { "step": "fail", "message": "connection reset" },
            { "step": "dispatch", "action": { "type": "request_hint" } }
        ]
    }"#;
    let reports = replay(script, SessionSettings::default(), false);

    assert_eq!(
        reports[1].state.contents,
        Some(PanelContents::StreamingText {
            text: "Let x be 4.".to_string(),
            streaming: false,
        })
    );

    assert_eq!(reports[3].state.panel, PanelState::Populated);
    assert!(matches!(
        &reports[3].state.contents,
        Some(PanelContents::Error { message }) if message.contains("connection reset")
    ));
}

#[test]
fn summaries_mention_outcome_and_contents() {
    let reports = replay(HINT_SESSION, SessionSettings::default(), false);
    let line = summarize(&reports[3]);
    assert!(line.starts_with("[3] dispatch unlock 0 -> applied"), "{line}");
    assert!(line.contains("hints 1/3 unlocked"), "{line}");

    let line = summarize(&reports[4]);
    assert!(line.contains("narrating hint_0"), "{line}");
}

#[test]
fn scripts_and_settings_load_from_disk() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    script.write_all(HINT_SESSION.as_bytes()).unwrap();
    assert_eq!(load_script(script.path()).unwrap().steps.len(), 9);

    let mut settings = tempfile::NamedTempFile::new().unwrap();
    settings
        .write_all(br#"{ "passiveGuestOverlay": false, "narration": { "maxChars": 400 } }"#)
        .unwrap();
    let loaded = load_settings(Some(settings.path())).unwrap();
    assert!(!loaded.passive_guest_overlay);
    assert_eq!(loaded.narration.max_chars, Some(400));
    assert!(loaded.narration.strip_markup);
}

#[test]
fn loading_errors_map_to_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert_eq!(load_script(&missing).unwrap_err().exit_code(), 74);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{ "noticeHistory": 0 }"#).unwrap();
    assert!(matches!(load_settings(Some(&bad)), Err(CliError::Config(_))));

    std::fs::write(&bad, "not json").unwrap();
    assert_eq!(load_settings(Some(&bad)).unwrap_err().exit_code(), 78);
}
