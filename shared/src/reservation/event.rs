//! Reservation events - immutable facts broadcast after each mutation

use serde::{Deserialize, Serialize};

/// Reservation event
///
/// Broadcast after the in-memory mutation commits; observers (presentation,
/// persistence mirrors) re-read the stores rather than reconstructing state
/// from these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationEvent {
    /// Event unique ID
    pub event_id: String,
    /// Reservation this event belongs to
    pub reservation_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub kind: ReservationEventKind,
}

/// Event kind enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationEventKind {
    /// Member intake created a pending request
    Submitted,
    /// Staff manual entry or walk-in, created directly confirmed
    Created { walk_in: bool },
    /// Pending → Confirmed
    Accepted { table_hint: Option<String> },
    /// Pending → removed
    Declined,
    /// Candidate table staged (not a commit)
    TableSelected { table_num: u8 },
    /// Confirmed → Sat
    Seated { table_num: u8, waitress_id: i64 },
}

impl ReservationEvent {
    pub fn new(reservation_id: impl Into<String>, kind: ReservationEventKind) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            reservation_id: reservation_id.into(),
            timestamp: crate::util::now_millis(),
            kind,
        }
    }
}
