#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

mod action;
mod coordinator;
mod error;
mod gate;
mod inflight;
mod ledger;
mod presenter;
mod render;

pub use action::{Action, DispatchOutcome};
pub use coordinator::Coordinator;
pub use error::SessionError;
pub use gate::GuestGate;
pub use inflight::{InFlight, PendingRequest, Settlement};
pub use ledger::RevealLedger;
pub use presenter::{ExplanationSlot, ExplanationTarget, Presentation, Reactions, ResponsePresenter};

// Dev-dependencies used only by integration tests.
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
