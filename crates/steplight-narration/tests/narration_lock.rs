//! Integration tests for the narration lock.
//!
//! Drives the lock through the request/collapse/completion cycle the
//! coordinator uses, across every narration source.

use steplight_core::{ChannelStatus, NarrationKey, NarrationSource};
use steplight_narration::{Acquired, NarrationError, NarrationLock};

const SOURCES: [NarrationSource; 4] = [
    NarrationSource::Hint,
    NarrationSource::Step,
    NarrationSource::Result,
    NarrationSource::Detail,
];

fn all_keys() -> Vec<NarrationKey> {
    SOURCES
        .iter()
        .flat_map(|&source| (0..3).map(move |i| NarrationKey::new(source, i)))
        .collect()
}

#[test]
fn exclusivity_holds_for_every_pair_of_distinct_keys() {
    for a in all_keys() {
        for b in all_keys().into_iter().filter(|b| *b != a) {
            let mut lock = NarrationLock::new();
            assert_eq!(lock.request(a), Ok(Acquired::Started));

            let err = lock.request(b).unwrap_err();
            assert!(matches!(err, NarrationError::Busy { active: Some(k) } if k == a));
            assert_eq!(lock.active(), Some(a), "{b} must not displace {a}");

            assert_eq!(lock.request(a), Ok(Acquired::AlreadyActive));
            assert_eq!(lock.active(), Some(a));
        }
    }
}

#[test]
fn collapse_of_non_owner_never_requests_a_stop() {
    for a in all_keys() {
        let mut lock = NarrationLock::new();
        lock.request(a).unwrap();
        for other in all_keys().into_iter().filter(|k| *k != a) {
            assert!(!lock.collapse(other));
        }
        assert_eq!(lock.active(), Some(a));
    }
}

#[test]
fn hint_scenario_request_reject_collapse() {
    let hint_0 = NarrationKey::parse("hint_0").unwrap();
    let hint_1 = NarrationKey::parse("hint_1").unwrap();

    let mut lock = NarrationLock::new();
    lock.request(hint_0).unwrap();
    assert_eq!(lock.active().map(|k| k.to_string()).as_deref(), Some("hint_0"));

    assert!(lock.request(hint_1).is_err());
    assert_eq!(lock.active(), Some(hint_0));

    assert!(lock.collapse(hint_0));
    assert_eq!(lock.active(), None);
}

#[test]
fn natural_completion_frees_the_lock_for_another_key() {
    let step_0 = NarrationKey::new(NarrationSource::Step, 0);
    let step_1 = NarrationKey::new(NarrationSource::Step, 1);

    let mut lock = NarrationLock::new();
    lock.request(step_0).unwrap();

    lock.observe_channel(ChannelStatus {
        is_playing: true,
        queue_length: 2,
        ..ChannelStatus::default()
    });
    assert!(lock.is_busy_for(step_1));

    // Queue drains but audio is still playing.
    assert_eq!(
        lock.observe_channel(ChannelStatus {
            is_playing: true,
            ..ChannelStatus::default()
        }),
        None
    );

    assert_eq!(lock.observe_channel(ChannelStatus::default()), Some(step_0));
    assert_eq!(lock.request(step_1), Ok(Acquired::Started));
}

#[test]
fn mute_state_does_not_affect_ownership() {
    let key = NarrationKey::new(NarrationSource::Result, 1);
    let mut lock = NarrationLock::new();
    lock.request(key).unwrap();

    lock.observe_channel(ChannelStatus {
        is_playing: true,
        is_muted: true,
        ..ChannelStatus::default()
    });
    assert_eq!(lock.active(), Some(key));
    assert!(lock.channel_status().is_muted);
}
