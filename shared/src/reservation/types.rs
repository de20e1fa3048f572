//! Reservation types and intake payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reservation lifecycle status
///
/// Legal transitions: `Pending → Confirmed` (accept), `Pending → Declined`
/// (terminal, row is removed), `Confirmed → Sat` (seat, terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Member-submitted request, awaiting a decision
    Pending,
    /// Accepted (or staff-entered directly); awaiting a physical table
    Confirmed,
    /// Party occupies an assigned table
    Sat,
    /// Terminal; declined rows are removed from the queue, so this value
    /// only appears on the wire, never in the store
    Declined,
}

/// Reservation record (预订)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub member_id: Option<i64>,
    pub member_name: String,
    pub member_phone: Option<String>,
    /// Calendar date key `YYYY-MM-DD`
    pub date_key: String,
    pub event_name: String,
    pub party_size: u32,
    pub occasion: String,
    pub notes: String,
    pub status: ReservationStatus,
    /// Table label; advisory until `Sat`, authoritative after
    pub table_assigned: Option<String>,
    /// Waitress staff id, set at seating
    pub waitress_assigned: Option<i64>,
    pub referred_by_promoter: Option<i64>,
    pub requested_at: i64,
}

/// Member-facing reservation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationIntake {
    pub member_id: Option<i64>,
    #[validate(length(min = 1, message = "guest name is required"))]
    pub member_name: String,
    pub member_phone: Option<String>,
    pub date_key: String,
    pub event_name: String,
    #[validate(range(min = 1, message = "party size must be at least 1"))]
    pub party_size: u32,
    pub occasion: String,
    pub notes: String,
    pub referred_by_promoter: Option<i64>,
}

/// Staff manual-entry payload (owner/manager/vip-host)
///
/// Lands directly in `Confirmed`, skipping the pending queue.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ManualReservationEntry {
    #[validate(length(min = 1, message = "guest name is required"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(range(min = 1, message = "party size must be at least 1"))]
    pub party_size: u32,
    pub occasion: String,
    pub notes: String,
}
