//! Interaction coordinator - the single mediator for one tutoring screen.
//!
//! Every user action goes through [`Coordinator::dispatch`]:
//!
//! ```text
//!   action ─▶ Guest Gate ─▶ domain handler ─▶ render state
//!               │              ├─ producer-bound: ledger guard → in-flight → producer → presenter
//!               │              └─ local: narration lock / clipboard / transport / reactions
//!               └─ guest + gated: pending action, overlay, no upstream call
//! ```
//!
//! The coordinator exclusively owns the ledger (inside the presenter), the
//! presenter, the narration lock, and the guest gate. The render state is
//! derived from those plus the in-flight tracker and is pushed to the
//! event emitter after every transition.

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::json;
use steplight_core::{
    ActionId, ActionRequest, ChannelStatus, Collaborators, ContentKind, NarrationKey, Notice,
    ProducerError, ProducerPayload, ProducerReply, Reaction, RenderState, ResponseShape,
    RevealPayload, SessionEvent, SessionSettings, SettingsError, StreamEvent, validate_settings,
};
use steplight_narration::{Acquired, NarrationError, NarrationLock, prepare_narration};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::action::{Action, DispatchOutcome};
use crate::error::SessionError;
use crate::gate::GuestGate;
use crate::inflight::{InFlight, PendingRequest, Settlement};
use crate::ledger::RevealLedger;
use crate::presenter::{ExplanationTarget, Presentation, ResponsePresenter};
use crate::render;

pub struct Coordinator {
    ports: Collaborators,
    settings: SessionSettings,
    presenter: ResponsePresenter,
    narration: NarrationLock,
    gate: GuestGate,
    in_flight: InFlight,
    /// Mode the viewer last requested, highlighted in the toolbar.
    current_action: Option<ActionId>,
    notices: VecDeque<Notice>,
}

impl Coordinator {
    pub fn new(ports: Collaborators, settings: SessionSettings) -> Result<Self, SettingsError> {
        validate_settings(&settings)?;

        let mut gate = GuestGate::new(settings.passive_guest_overlay);
        gate.observe(ports.auth.is_authenticated());

        tracing::info!(
            authenticated = gate.is_authenticated(),
            passive_overlay = settings.passive_guest_overlay,
            "Session coordinator created"
        );

        Ok(Self {
            ports,
            settings,
            presenter: ResponsePresenter::new(),
            narration: NarrationLock::new(),
            gate,
            in_flight: InFlight::new(),
            current_action: None,
            notices: VecDeque::new(),
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub const fn presentation(&self) -> Option<&Presentation> {
        self.presenter.current()
    }

    pub const fn ledger(&self) -> Option<&RevealLedger> {
        self.presenter.ledger()
    }

    pub const fn active_narration(&self) -> Option<NarrationKey> {
        self.narration.active()
    }

    pub const fn pending_action(&self) -> Option<ActionId> {
        self.gate.pending()
    }

    pub const fn in_flight(&self) -> Option<&PendingRequest> {
        self.in_flight.pending()
    }

    pub const fn last_settlement(&self) -> Option<&(ActionId, Settlement)> {
        self.in_flight.last_settlement()
    }

    // ── Dispatch ───────────────────────────────────────────────────

    /// Handle one user action end to end.
    ///
    /// Producer-bound actions are awaited until their reply (or stream) is
    /// fully applied. Guarded and resource failures come back as
    /// [`DispatchOutcome::Rejected`] with a notice already recorded.
    pub async fn dispatch(&mut self, action: Action) -> DispatchOutcome {
        if action.is_producer_bound() {
            let request = match self.begin_request(action) {
                Ok(request) => request,
                Err(outcome) => return outcome,
            };
            let request_id = request.request_id;
            let producer = Arc::clone(&self.ports.producer);
            let reply = producer.request_action(request).await;
            return self.complete_request(request_id, reply).await;
        }

        let id = action.id(self.list_kind());
        if let Err(outcome) = self.admit(id) {
            return outcome;
        }

        let outcome = match self.run_local(action, id).await {
            Ok(()) => DispatchOutcome::Applied,
            Err(err) => self.reject(Some(id), err),
        };
        self.publish();
        outcome
    }

    /// First half of a producer-bound action.
    ///
    /// Runs the gate and every guard, records the request as pending, and
    /// moves the panel to its loading state. The caller sends the returned
    /// request upstream and hands the reply to
    /// [`complete_request`](Self::complete_request).
    pub fn begin_request(&mut self, action: Action) -> Result<ActionRequest, DispatchOutcome> {
        let id = action.id(self.list_kind());
        self.admit(id)?;

        match self.prepare_request(action, id) {
            Ok(request) => {
                self.publish();
                Ok(request)
            }
            Err(err) => {
                let outcome = self.reject(Some(id), err);
                self.publish();
                Err(outcome)
            }
        }
    }

    /// Second half of a producer-bound action: apply the producer's reply.
    pub async fn complete_request(
        &mut self,
        request_id: Uuid,
        reply: Result<ProducerReply, ProducerError>,
    ) -> DispatchOutcome {
        let Some(pending) = self.in_flight.matching(request_id) else {
            tracing::warn!(%request_id, "Ignoring reply for a request that is not pending");
            return DispatchOutcome::Rejected(SessionError::UnknownRequest);
        };

        let outcome = match reply {
            Ok(ProducerReply::Complete(payload)) => self.apply_reply(&pending, payload),
            Ok(ProducerReply::Stream(events)) => self.consume_stream(&pending, events).await,
            Err(err) => self.fail_request(&pending, err.to_string()),
        };
        self.publish();
        outcome
    }

    // ── External events ────────────────────────────────────────────

    /// The audio channel pushed a new status.
    pub fn on_channel_status(&mut self, status: ChannelStatus) {
        if let Some(key) = self.narration.observe_channel(status) {
            self.emit(SessionEvent::NarrationStopped { key });
        }
        self.publish();
    }

    /// The auth provider reported a change; re-read it from the port.
    pub fn on_auth_changed(&mut self) {
        self.sync_auth();
        self.publish();
    }

    /// Replace the on-screen content with a new reveal list.
    pub fn reset_ledger(&mut self, reveal: RevealPayload) {
        self.replace_presentation(Some(Presentation::RevealList(RevealLedger::from_payload(
            reveal,
        ))));
        self.publish();
    }

    /// Current render state. Auth is re-read first so the overlay is never
    /// stale across a sign-in.
    pub fn render(&mut self) -> RenderState {
        self.sync_auth();
        self.snapshot()
    }

    /// Tear the screen down, stopping any narration it owns.
    pub fn close(&mut self) {
        self.release_narration();
        tracing::info!("Session coordinator closed");
    }

    // ── Producer-bound actions ─────────────────────────────────────

    fn prepare_request(&mut self, action: Action, id: ActionId) -> Result<ActionRequest, SessionError> {
        self.in_flight.check_idle()?;

        let (payload, unlock) = match action {
            Action::RequestHint { payload }
            | Action::RequestNextStep { payload }
            | Action::RequestFinalVerification { payload } => (payload, None),
            Action::Unlock { index } => {
                let ledger = self.presenter.ledger().ok_or(SessionError::NoRevealList)?;
                ledger.check_unlock(index)?;
                (json!({ "kind": ledger.kind(), "index": index }), Some(index))
            }
            _ => return Err(SessionError::NotARequest { action: id }),
        };

        match unlock {
            Some(index) => {
                if let Some(ledger) = self.presenter.ledger_mut() {
                    ledger.unlock(index)?;
                }
            }
            None => {
                self.replace_presentation(None);
                self.current_action = Some(id);
            }
        }

        let request = ActionRequest::new(id, payload);
        self.in_flight.begin(&request, unlock)?;
        tracing::info!(request_id = %request.request_id, action = id.as_str(), "Producer request issued");
        Ok(request)
    }

    fn apply_reply(&mut self, pending: &PendingRequest, payload: ProducerPayload) -> DispatchOutcome {
        match ResponseShape::select(payload) {
            Some(shape) => self.replace_presentation(Some(shape.into())),
            None if pending.is_follow_up() => {
                tracing::debug!(action = pending.action.as_str(), "Follow-up acknowledged");
            }
            None => {
                tracing::debug!(action = pending.action.as_str(), "Reply had nothing to display");
            }
        }
        self.in_flight.settle(pending, Settlement::Resolved);
        DispatchOutcome::Applied
    }

    async fn consume_stream(
        &mut self,
        pending: &PendingRequest,
        mut events: mpsc::UnboundedReceiver<StreamEvent>,
    ) -> DispatchOutcome {
        while let Some(event) = events.recv().await {
            match event {
                StreamEvent::Delta(delta) => {
                    if self.presenter.append_stream(&delta) {
                        self.release_narration();
                    }
                    self.publish();
                }
                StreamEvent::Done(payload) => {
                    self.presenter.finish_stream();
                    if let Some(shape) = payload.and_then(ResponseShape::select) {
                        self.replace_presentation(Some(shape.into()));
                    }
                    self.in_flight.settle(pending, Settlement::Resolved);
                    return DispatchOutcome::Applied;
                }
                StreamEvent::Failed(message) => return self.fail_request(pending, message),
            }
        }

        tracing::debug!(action = pending.action.as_str(), "Stream closed without a terminal event");
        self.presenter.finish_stream();
        self.in_flight.settle(pending, Settlement::Resolved);
        DispatchOutcome::Applied
    }

    /// Upstream failure. Primary requests present it as an error shape;
    /// unlock follow-ups roll the unlock back and raise a notice instead.
    fn fail_request(&mut self, pending: &PendingRequest, message: String) -> DispatchOutcome {
        self.in_flight
            .settle(pending, Settlement::Rejected(message.clone()));
        let err = SessionError::Upstream(message);

        if let Some(index) = pending.unlocked {
            self.relock(index);
            return self.reject(Some(pending.action), err);
        }

        tracing::warn!(action = pending.action.as_str(), error = %err, "Producer request failed");
        self.replace_presentation(Some(Presentation::Error(err.to_string())));
        DispatchOutcome::Rejected(err)
    }

    /// Lock `index` again after its follow-up failed. The item may have been
    /// expanded and narrated while the request was pending; a locked item
    /// keeps neither.
    fn relock(&mut self, index: usize) {
        let Some(ledger) = self.presenter.ledger_mut() else {
            return;
        };
        if !ledger.revert_unlock(index) {
            return;
        }
        let key = ledger.narration_key(index);

        self.presenter.set_expanded(index, false);
        if self.narration.collapse(key) {
            self.ports.audio.stop();
            self.emit(SessionEvent::NarrationStopped { key });
        }
    }

    // ── Local actions ──────────────────────────────────────────────

    async fn run_local(&mut self, action: Action, id: ActionId) -> Result<(), SessionError> {
        match action {
            Action::ToggleExplanation { target } => self.toggle_explanation(target).await,
            Action::Copy => self.copy(),
            Action::Like => self.like(),
            Action::Dislike => self.dislike(),
            Action::ToggleMute => {
                let muted = !self.narration.channel_status().is_muted;
                self.ports.audio.set_muted(muted);
                tracing::debug!(muted, "Mute toggled");
                Ok(())
            }
            Action::TogglePlay => self.toggle_play(),
            Action::SignIn => {
                self.ports.auth.open_sign_in_prompt();
                self.emit(SessionEvent::SignInRequested);
                Ok(())
            }
            Action::DismissSignIn => {
                if let Some(action) = self.gate.dismiss() {
                    tracing::debug!(action = action.as_str(), "Sign-in prompt dismissed");
                }
                Ok(())
            }
            Action::RequestHint { .. }
            | Action::RequestNextStep { .. }
            | Action::RequestFinalVerification { .. }
            | Action::Unlock { .. } => Err(SessionError::NotARequest { action: id }),
        }
    }

    async fn toggle_explanation(&mut self, target: ExplanationTarget) -> Result<(), SessionError> {
        let (key, slot, expanded, spoken) = {
            let resolved = self.presenter.explanation(target)?;
            let spoken = resolved
                .text
                .map(|text| prepare_narration(text, &self.settings.narration))
                .filter(|text| !text.is_empty());
            (
                resolved.key,
                resolved.slot,
                self.presenter.is_expanded(resolved.slot),
                spoken,
            )
        };

        if expanded {
            self.presenter.set_expanded(slot, false);
            if self.narration.collapse(key) {
                self.ports.audio.stop();
                self.emit(SessionEvent::NarrationStopped { key });
            }
            return Ok(());
        }

        let spoken = spoken.ok_or(SessionError::NoExplanation { key })?;

        if self.narration.request(key)? == Acquired::Started {
            let audio = Arc::clone(&self.ports.audio);
            if let Err(err) = audio.speak(&spoken, key).await {
                self.narration.abort(key);
                return Err(NarrationError::from(err).into());
            }
            self.emit(SessionEvent::NarrationStarted { key });
        }

        self.presenter.set_expanded(slot, true);
        Ok(())
    }

    fn copy(&mut self) -> Result<(), SessionError> {
        let text = self.presenter.copy_text()?;
        self.ports
            .clipboard
            .write_text(&text)
            .map_err(|e| SessionError::Clipboard(e.to_string()))?;
        self.presenter.mark_copied();
        self.emit(SessionEvent::Reaction {
            reaction: Reaction::Copied,
        });
        Ok(())
    }

    fn like(&mut self) -> Result<(), SessionError> {
        if !self.presenter.has_displayable_content() {
            return Err(SessionError::NothingToRate);
        }
        let reaction = if self.presenter.toggle_like() {
            Reaction::Liked
        } else {
            Reaction::Cleared
        };
        self.emit(SessionEvent::Reaction { reaction });
        Ok(())
    }

    fn dislike(&mut self) -> Result<(), SessionError> {
        if !self.presenter.has_displayable_content() {
            return Err(SessionError::NothingToRate);
        }
        let reaction = if self.presenter.toggle_dislike() {
            Reaction::Disliked
        } else {
            Reaction::Cleared
        };
        self.emit(SessionEvent::Reaction { reaction });
        Ok(())
    }

    /// Pause or resume whatever is playing, bypassing the narration lock.
    fn toggle_play(&self) -> Result<(), SessionError> {
        let status = self.narration.channel_status();
        if status.is_playing {
            self.ports.audio.pause();
        } else if status.is_paused {
            self.ports.audio.resume();
        } else {
            return Err(SessionError::NothingPlaying);
        }
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    fn list_kind(&self) -> Option<ContentKind> {
        self.presenter.ledger().map(RevealLedger::kind)
    }

    fn sync_auth(&mut self) {
        if let Some(action) = self.gate.observe(self.ports.auth.is_authenticated()) {
            tracing::info!(action = action.as_str(), "Sign-in cleared pending action");
        }
    }

    /// Run the guest gate for `id`.
    fn admit(&mut self, id: ActionId) -> Result<(), DispatchOutcome> {
        self.sync_auth();
        if let Err(err) = self.gate.intercept(id) {
            self.record_notice(Some(id), &err);
            self.publish();
            return Err(DispatchOutcome::Suspended { action: id });
        }
        Ok(())
    }

    /// Swap the on-screen shape. Narration tied to the old shape is stopped.
    fn replace_presentation(&mut self, next: Option<Presentation>) {
        self.presenter.replace(next);
        self.release_narration();
    }

    fn release_narration(&mut self) {
        if let Some(key) = self.narration.release() {
            self.ports.audio.stop();
            self.emit(SessionEvent::NarrationStopped { key });
        }
    }

    fn reject(&mut self, action: Option<ActionId>, err: SessionError) -> DispatchOutcome {
        self.record_notice(action, &err);
        DispatchOutcome::Rejected(err)
    }

    fn record_notice(&mut self, action: Option<ActionId>, err: &SessionError) {
        let notice = Notice::new(err.category(), action, err.to_string());
        tracing::warn!(
            action = action.map(|a| a.as_str()),
            category = ?notice.category,
            "{}",
            notice.message
        );

        self.emit(SessionEvent::Notice {
            notice: notice.clone(),
        });
        self.notices.push_back(notice);
        while self.notices.len() > self.settings.notice_history {
            self.notices.pop_front();
        }
    }

    fn snapshot(&self) -> RenderState {
        let loading = self.in_flight.is_loading();
        let gated_content = self
            .presenter
            .current()
            .is_some_and(Presentation::is_gated_content);
        let channel = self.narration.channel_status();

        RenderState {
            panel: render::panel_state(&self.presenter, loading),
            contents: render::panel_contents(&self.presenter),
            overlay: self.gate.overlay(gated_content),
            pending_action: self.gate.pending(),
            active_narration: self.narration.active(),
            in_flight: self.in_flight.pending().map(|p| p.action),
            current_action: self.current_action,
            controls: render::controls(&self.presenter, channel, loading, self.current_action),
            notices: self.notices.iter().cloned().collect(),
        }
    }

    fn emit(&self, event: SessionEvent) {
        self.ports.events.emit(event);
    }

    fn publish(&self) {
        self.emit(SessionEvent::render_changed(self.snapshot()));
    }
}
