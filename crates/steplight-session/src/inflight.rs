//! Single-flight tracking of producer requests.
//!
//! Each request moves through `pending → resolved | rejected` under its own
//! id. Only one request may be pending per coordinator; replies are matched
//! against the pending id so a late reply can never settle a newer request.

use steplight_core::{ActionId, ActionRequest};
use uuid::Uuid;

use crate::error::SessionError;

/// A request that is waiting for its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: Uuid,
    pub action: ActionId,
    /// Ledger index unlocked optimistically for this request.
    pub unlocked: Option<usize>,
}

impl PendingRequest {
    /// Unlock follow-ups keep the current shape unless their reply
    /// replaces it.
    pub const fn is_follow_up(&self) -> bool {
        self.unlocked.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Resolved,
    Rejected(String),
}

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    pending: Option<PendingRequest>,
    last: Option<(ActionId, Settlement)>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub const fn last_settlement(&self) -> Option<&(ActionId, Settlement)> {
        self.last.as_ref()
    }

    /// Refuse a request while another one is pending.
    pub const fn check_idle(&self) -> Result<(), SessionError> {
        match &self.pending {
            Some(pending) => Err(SessionError::RequestInFlight {
                pending: pending.action,
            }),
            None => Ok(()),
        }
    }

    pub fn begin(&mut self, request: &ActionRequest, unlocked: Option<usize>) -> Result<(), SessionError> {
        self.check_idle()?;
        tracing::debug!(request_id = %request.request_id, action = request.action.as_str(), "Request pending");
        self.pending = Some(PendingRequest {
            id: request.request_id,
            action: request.action,
            unlocked,
        });
        Ok(())
    }

    /// The pending request, if `id` names it.
    pub fn matching(&self, id: Uuid) -> Option<PendingRequest> {
        self.pending.filter(|p| p.id == id)
    }

    /// Finish `request`. It stays pending until this is called, so a
    /// streamed reply keeps the coordinator busy until its terminal event.
    pub fn settle(&mut self, request: &PendingRequest, settlement: Settlement) {
        tracing::debug!(request_id = %request.id, action = request.action.as_str(), ?settlement, "Request settled");
        if self.pending.is_some_and(|p| p.id == request.id) {
            self.pending = None;
        }
        self.last = Some((request.action, settlement));
    }
}
