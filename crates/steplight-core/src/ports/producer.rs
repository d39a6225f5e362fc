//! Upstream producer port - the opaque tutor backend that answers actions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::{ActionId, ProducerPayload};

/// One request sent upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub request_id: Uuid,
    pub action: ActionId,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ActionRequest {
    pub fn new(action: ActionId, payload: serde_json::Value) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            action,
            payload,
        }
    }
}

/// Incremental event of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// More raw text.
    Delta(String),
    /// The stream finished, optionally with a structured payload.
    Done(Option<ProducerPayload>),
    /// The stream broke off.
    Failed(String),
}

/// Reply to an [`ActionRequest`].
#[derive(Debug)]
pub enum ProducerReply {
    Complete(ProducerPayload),
    Stream(mpsc::UnboundedReceiver<StreamEvent>),
}

/// Errors returned by [`ProducerPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProducerError {
    /// The request never reached the producer or the connection dropped.
    #[error("Network error: {0}")]
    Network(String),

    /// The producer refused the request.
    #[error("Producer rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request was cancelled before completion.
    #[error("Request cancelled")]
    Cancelled,

    /// Unexpected failure inside the producer.
    #[error("Producer error: {0}")]
    Internal(String),
}

/// Port for the upstream hint/step/verification producer.
///
/// At most one call is in flight per coordinator.
#[async_trait]
pub trait ProducerPort: Send + Sync {
    async fn request_action(&self, request: ActionRequest) -> Result<ProducerReply, ProducerError>;
}
