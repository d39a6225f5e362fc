#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod render;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ActionId, ActiveItem, ContentItem, ContentKind, NarrationKey, NarrationSource,
    ProducerPayload, ResponseShape, ResultKind, RevealPayload, ShapeKind, StepJudgement,
    StructuredResult,
};
pub use events::{Reaction, SessionEvent};
pub use ports::{
    ActionRequest, AudioChannelError, AudioChannelPort, AuthStatePort, ChannelEmitter,
    ChannelStatus, ClipboardError, ClipboardPort, Collaborators, MemoryClipboard, NoopEmitter,
    ProducerError, ProducerPort, ProducerReply, SessionEventEmitter, StaticAuthState,
    StreamEvent,
};
pub use render::{
    ControlState, Controls, ItemStatus, ItemView, JudgementView, Notice, NoticeCategory,
    OverlayReason, PanelContents, PanelState, RenderState,
};
pub use settings::{
    DEFAULT_NARRATION_MAX_CHARS, DEFAULT_NOTICE_HISTORY, NarrationSettings, SessionSettings,
    SettingsError, SettingsUpdate, validate_settings,
};
