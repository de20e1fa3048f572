//! Thread events - broadcast after thread store mutations

use super::types::{ThreadTag, ThreadType};
use serde::{Deserialize, Serialize};

/// Thread event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadEvent {
    /// Event unique ID
    pub event_id: String,
    /// Thread this event belongs to
    pub thread_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub kind: ThreadEventKind,
}

/// Event kind enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadEventKind {
    Created { thread_type: ThreadType },
    MessageAppended,
    /// Owner re-route: type, tag, recipients and name all rewritten
    Moved { new_type: ThreadType },
    /// Display retag: tag + recipients rewritten, type untouched
    Retagged { new_tag: ThreadTag },
}

impl ThreadEvent {
    pub fn new(thread_id: impl Into<String>, kind: ThreadEventKind) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            thread_id: thread_id.into(),
            timestamp: crate::util::now_millis(),
            kind,
        }
    }
}
