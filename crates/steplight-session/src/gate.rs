//! Guest gate - authentication gating of step and verification actions.
//!
//! The gate never caches a stale auth view: the coordinator feeds it the
//! port's answer before every dispatch and render, and a transition to
//! authenticated clears any pending action.

use steplight_core::{ActionId, OverlayReason};

use crate::error::SessionError;

#[derive(Debug, Clone, Default)]
pub struct GuestGate {
    authenticated: bool,
    pending: Option<ActionId>,
    passive_overlay: bool,
}

impl GuestGate {
    pub const fn new(passive_overlay: bool) -> Self {
        Self {
            authenticated: false,
            pending: None,
            passive_overlay,
        }
    }

    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub const fn pending(&self) -> Option<ActionId> {
        self.pending
    }

    /// Record the current auth state. Returns the pending action that an
    /// authentication cleared, if any.
    pub fn observe(&mut self, authenticated: bool) -> Option<ActionId> {
        if authenticated != self.authenticated {
            tracing::debug!(authenticated, "Guest gate observed auth change");
        }
        self.authenticated = authenticated;
        if authenticated { self.pending.take() } else { None }
    }

    /// Let `action` through, or record it as pending for a guest.
    pub fn intercept(&mut self, action: ActionId) -> Result<(), SessionError> {
        if self.authenticated || !action.is_gated() {
            return Ok(());
        }
        tracing::debug!(action = action.as_str(), "Gated action suspended for guest");
        self.pending = Some(action);
        Err(SessionError::GatedWhileGuest { action })
    }

    /// Close the overlay without authenticating.
    pub fn dismiss(&mut self) -> Option<ActionId> {
        self.pending.take()
    }

    /// Overlay to show, given whether the on-screen content is gated.
    ///
    /// A pending action takes precedence over passive gating, so at most
    /// one overlay is ever visible.
    pub const fn overlay(&self, gated_content: bool) -> Option<OverlayReason> {
        if self.authenticated {
            return None;
        }
        match self.pending {
            Some(action) => Some(OverlayReason::PendingAction { action }),
            None if self.passive_overlay && gated_content => Some(OverlayReason::GatedContent),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guests_are_stopped_at_gated_actions_only() {
        let mut gate = GuestGate::new(true);
        assert!(gate.intercept(ActionId::Hint).is_ok());
        assert_eq!(gate.pending(), None);

        assert_eq!(
            gate.intercept(ActionId::NextStep),
            Err(SessionError::GatedWhileGuest {
                action: ActionId::NextStep
            })
        );
        assert_eq!(gate.pending(), Some(ActionId::NextStep));
        assert_eq!(
            gate.overlay(false),
            Some(OverlayReason::PendingAction {
                action: ActionId::NextStep
            })
        );
    }

    #[test]
    fn authentication_clears_pending_and_overlay() {
        let mut gate = GuestGate::new(true);
        let _ = gate.intercept(ActionId::FinalVerification);

        assert_eq!(gate.observe(true), Some(ActionId::FinalVerification));
        assert_eq!(gate.pending(), None);
        assert_eq!(gate.overlay(true), None);
        assert!(gate.intercept(ActionId::FinalVerification).is_ok());
    }

    #[test]
    fn pending_overlay_wins_over_passive() {
        let mut gate = GuestGate::new(true);
        assert_eq!(gate.overlay(true), Some(OverlayReason::GatedContent));

        let _ = gate.intercept(ActionId::NextStep);
        assert!(matches!(
            gate.overlay(true),
            Some(OverlayReason::PendingAction { .. })
        ));

        gate.dismiss();
        assert_eq!(gate.overlay(true), Some(OverlayReason::GatedContent));
    }

    #[test]
    fn passive_overlay_can_be_disabled() {
        let gate = GuestGate::new(false);
        assert_eq!(gate.overlay(true), None);
    }
}
