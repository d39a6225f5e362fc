//! Core domain types.
//!
//! Pure data shared by every steplight crate. Nothing in here talks to a
//! collaborator; ports live in [`crate::ports`].

mod action;
mod content;
mod narration;
mod result;
mod shape;

pub use action::ActionId;
pub use content::{ContentItem, ContentKind};
pub use narration::{NarrationKey, NarrationSource};
pub use result::{ResultKind, StepJudgement, StructuredResult};
pub use shape::{ActiveItem, ProducerPayload, ResponseShape, RevealPayload, ShapeKind};
