//! Audit log types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Audited action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    ReservationAccepted,
    ReservationDeclined,
    TableSat,
    CompIssued,
    ThreadMoved,
    ThreadRetagged,
    PriceChanged,
    StaffChanged,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditAction::ReservationAccepted => "RESERVATION_ACCEPTED",
            AuditAction::ReservationDeclined => "RESERVATION_DECLINED",
            AuditAction::TableSat => "TABLE_SAT",
            AuditAction::CompIssued => "COMP_ISSUED",
            AuditAction::ThreadMoved => "THREAD_MOVED",
            AuditAction::ThreadRetagged => "THREAD_RETAGGED",
            AuditAction::PriceChanged => "PRICE_CHANGED",
            AuditAction::StaffChanged => "STAFF_CHANGED",
        };
        f.write_str(s)
    }
}

/// Audit log entry (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub action: AuditAction,
    /// Resource kind, e.g. `reservation`, `thread`
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
    /// Unix millis
    pub created_at: i64,
}
