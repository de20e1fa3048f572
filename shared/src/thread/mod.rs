//! Conversation thread domain types
//!
//! A thread carries a structural `type` (routing + bucketing) and a display
//! `tag` (color label) — two independently settable fields. Type drives who
//! sees the thread; tag drives how it is labeled.

pub mod event;
pub mod types;

pub use event::{ThreadEvent, ThreadEventKind};
pub use types::{
    ParticipantKind, PrivateParticipant, SenderKind, SmsThread, ThreadMessage, ThreadTag,
    ThreadType,
};
