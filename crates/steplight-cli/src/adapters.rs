//! Collaborators used by the replay harness.
//!
//! The producer answers from replies queued by the script; the audio
//! channel writes what it would speak to the tracing log.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use steplight_core::{
    ActionRequest, AudioChannelError, AudioChannelPort, NarrationKey, ProducerError,
    ProducerPayload, ProducerPort, ProducerReply, StreamEvent,
};
use tokio::sync::mpsc;

/// A reply queued by a script step.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Complete(ProducerPayload),
    Stream(Vec<StreamEvent>),
    Fail(String),
}

/// Producer that pops one queued reply per request.
///
/// With nothing queued it answers with an empty payload, which the session
/// treats as a plain acknowledgement.
#[derive(Debug, Default)]
pub struct ScriptedProducer {
    replies: Mutex<VecDeque<ScriptedReply>>,
}

impl ScriptedProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, reply: ScriptedReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn queued(&self) -> usize {
        self.replies.lock().map_or(0, |replies| replies.len())
    }
}

#[async_trait]
impl ProducerPort for ScriptedProducer {
    async fn request_action(&self, request: ActionRequest) -> Result<ProducerReply, ProducerError> {
        let reply = self
            .replies
            .lock()
            .map_err(|_| ProducerError::Internal("reply queue poisoned".to_string()))?
            .pop_front();

        tracing::info!(
            request_id = %request.request_id,
            action = request.action.as_str(),
            payload = %request.payload,
            "Producer request"
        );

        match reply {
            None => Ok(ProducerReply::Complete(ProducerPayload::default())),
            Some(ScriptedReply::Complete(payload)) => Ok(ProducerReply::Complete(payload)),
            Some(ScriptedReply::Fail(message)) => Err(ProducerError::Network(message)),
            Some(ScriptedReply::Stream(events)) => {
                let (tx, rx) = mpsc::unbounded_channel();
                for event in events {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(ProducerReply::Stream(rx))
            }
        }
    }
}

/// Audio channel that only logs.
#[derive(Debug, Default)]
pub struct TracingAudioChannel;

impl TracingAudioChannel {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioChannelPort for TracingAudioChannel {
    async fn speak(&self, text: &str, key: NarrationKey) -> Result<(), AudioChannelError> {
        tracing::info!(%key, text, "Speak");
        Ok(())
    }

    fn stop(&self) {
        tracing::info!("Stop narration");
    }

    fn pause(&self) {
        tracing::info!("Pause narration");
    }

    fn resume(&self) {
        tracing::info!("Resume narration");
    }

    fn set_muted(&self, muted: bool) {
        tracing::info!(muted, "Set muted");
    }
}
