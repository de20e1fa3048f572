//! Follow-up job rows
//!
//! A scheduled-job entry with a fire-at timestamp, persisted so the
//! scheduler can recover across restarts (at-least-once delivery).

use serde::{Deserialize, Serialize};

/// Deferred follow-up message job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpJob {
    pub id: String,
    pub member_id: i64,
    pub member_name: String,
    /// Event the party attended; drives the prompt wording
    pub event_name: String,
    /// Unix millis; next 9:00 local strictly after scheduling time
    pub fire_at: i64,
}
