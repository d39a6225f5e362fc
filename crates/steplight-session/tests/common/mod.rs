//! In-memory collaborators shared by the session integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use steplight_core::{
    ActionRequest, ActiveItem, AudioChannelError, AudioChannelPort, ChannelEmitter, Collaborators,
    ContentItem, ContentKind, MemoryClipboard, NarrationKey, ProducerError, ProducerPayload,
    ProducerPort, ProducerReply, ResultKind, RevealPayload, SessionEvent, SessionSettings,
    StaticAuthState, StepJudgement, StreamEvent, StructuredResult,
};
use steplight_session::Coordinator;
use tokio::sync::mpsc;

// ── Producer ───────────────────────────────────────────────────────

enum Scripted {
    Payload(ProducerPayload),
    Stream(Vec<StreamEvent>),
    Fail(ProducerError),
}

/// Producer that answers from a queue of canned replies.
///
/// An empty queue answers with an empty payload, which is how the tutor
/// acknowledges an unlock.
#[derive(Default)]
pub struct ScriptedProducer {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ActionRequest>>,
}

impl ScriptedProducer {
    pub fn push_payload(&self, payload: ProducerPayload) {
        self.replies.lock().unwrap().push_back(Scripted::Payload(payload));
    }

    pub fn push_stream(&self, events: Vec<StreamEvent>) {
        self.replies.lock().unwrap().push_back(Scripted::Stream(events));
    }

    pub fn push_error(&self, err: ProducerError) {
        self.replies.lock().unwrap().push_back(Scripted::Fail(err));
    }

    pub fn requests(&self) -> Vec<ActionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProducerPort for ScriptedProducer {
    async fn request_action(&self, request: ActionRequest) -> Result<ProducerReply, ProducerError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            None => Ok(ProducerReply::Complete(ProducerPayload::default())),
            Some(Scripted::Payload(payload)) => Ok(ProducerReply::Complete(payload)),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Stream(events)) => {
                let (tx, rx) = mpsc::unbounded_channel();
                for event in events {
                    tx.send(event).unwrap();
                }
                Ok(ProducerReply::Stream(rx))
            }
        }
    }
}

// ── Audio channel ──────────────────────────────────────────────────

/// Audio channel that records every call.
#[derive(Default)]
pub struct RecordingAudio {
    spoken: Mutex<Vec<(String, NarrationKey)>>,
    stops: AtomicUsize,
    pauses: AtomicUsize,
    resumes: AtomicUsize,
    muted: Mutex<Vec<bool>>,
    fail_speak: AtomicBool,
}

impl RecordingAudio {
    pub fn spoken(&self) -> Vec<(String, NarrationKey)> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }

    pub fn resumes(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }

    pub fn mute_calls(&self) -> Vec<bool> {
        self.muted.lock().unwrap().clone()
    }

    pub fn fail_next_speak(&self) {
        self.fail_speak.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AudioChannelPort for RecordingAudio {
    async fn speak(&self, text: &str, key: NarrationKey) -> Result<(), AudioChannelError> {
        if self.fail_speak.swap(false, Ordering::SeqCst) {
            return Err(AudioChannelError::Unavailable("no voice installed".into()));
        }
        self.spoken.lock().unwrap().push((text.to_string(), key));
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
    }

    fn set_muted(&self, muted: bool) {
        self.muted.lock().unwrap().push(muted);
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub struct Harness {
    pub coordinator: Coordinator,
    pub producer: Arc<ScriptedProducer>,
    pub auth: Arc<StaticAuthState>,
    pub clipboard: Arc<MemoryClipboard>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Harness {
    /// Drain every event emitted so far.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn harness_with(
    authenticated: bool,
    audio: Arc<dyn AudioChannelPort>,
    settings: SessionSettings,
) -> Harness {
    let producer = Arc::new(ScriptedProducer::default());
    let auth = Arc::new(StaticAuthState::new(authenticated));
    let clipboard = Arc::new(MemoryClipboard::new());
    let (emitter, events) = ChannelEmitter::new();

    let ports = Collaborators::new(producer.clone(), audio, auth.clone(), clipboard.clone())
        .with_events(Arc::new(emitter));
    let coordinator = Coordinator::new(ports, settings).unwrap();

    Harness {
        coordinator,
        producer,
        auth,
        clipboard,
        events,
    }
}

pub fn harness(authenticated: bool) -> (Harness, Arc<RecordingAudio>) {
    let audio = Arc::new(RecordingAudio::default());
    let harness = harness_with(authenticated, audio.clone(), SessionSettings::default());
    (harness, audio)
}

// ── Content fixtures ───────────────────────────────────────────────

pub fn reveal(kind: ContentKind, len: usize, unlocked_count: usize) -> RevealPayload {
    let noun = match kind {
        ContentKind::Hints => "hint",
        ContentKind::Steps => "step",
    };
    RevealPayload {
        kind,
        items: (0..len)
            .map(|i| {
                ContentItem::new(format!("{noun} {i}"))
                    .with_explanation(format!("why {noun} {i} works"))
            })
            .collect(),
        unlocked_count,
    }
}

pub fn reveal_payload(kind: ContentKind, len: usize, unlocked_count: usize) -> ProducerPayload {
    ProducerPayload {
        reveal: Some(reveal(kind, len, unlocked_count)),
        ..ProducerPayload::default()
    }
}

pub fn detail_payload() -> ProducerPayload {
    ProducerPayload {
        active_item: Some(ActiveItem {
            kind: ContentKind::Steps,
            index: 2,
            item: ContentItem::new("Divide both sides by 2")
                .with_explanation("Dividing keeps the equation balanced"),
        }),
        ..ProducerPayload::default()
    }
}

pub fn verification_payload() -> ProducerPayload {
    ProducerPayload::structured(StructuredResult {
        kind: ResultKind::Verification,
        steps: vec![
            StepJudgement {
                student_step: "2x = 4".into(),
                correct_step: "2x = 4".into(),
                is_correct: true,
                explanation: Some("Subtracting 3 from both sides".into()),
            },
            StepJudgement {
                student_step: "x = 3".into(),
                correct_step: "x = 2".into(),
                is_correct: false,
                explanation: Some("4 divided by 2 is 2".into()),
            },
        ],
        summary: Some("Almost there.".into()),
    })
}
