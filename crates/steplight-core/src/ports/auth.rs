//! Authentication state port.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Read-only view of the viewer's session, polled on every render.
pub trait AuthStatePort: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Ask the shell to show its sign-in prompt.
    fn open_sign_in_prompt(&self);
}

/// Auth state held in an atomic flag.
///
/// Used by the CLI replay harness and by tests; a real shell backs the port
/// with its auth provider.
#[derive(Debug, Default)]
pub struct StaticAuthState {
    authenticated: AtomicBool,
    prompts_opened: AtomicUsize,
}

impl StaticAuthState {
    pub const fn new(authenticated: bool) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
            prompts_opened: AtomicUsize::new(0),
        }
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
        tracing::debug!(authenticated, "Auth state changed");
    }

    /// How many times the sign-in prompt was requested.
    pub fn prompts_opened(&self) -> usize {
        self.prompts_opened.load(Ordering::SeqCst)
    }
}

impl AuthStatePort for StaticAuthState {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn open_sign_in_prompt(&self) {
        self.prompts_opened.fetch_add(1, Ordering::SeqCst);
    }
}
