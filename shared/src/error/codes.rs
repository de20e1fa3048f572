//! Unified error codes for the floor-server core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 3xxx: Thread errors
//! - 4xxx: Reservation errors
//! - 5xxx: Sale errors
//! - 7xxx: Table errors
//! - 8xxx: Member/staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 2xxx: Permission ====================
    /// Role lacks the capability for this operation
    PermissionDenied = 2001,

    // ==================== 3xxx: Thread ====================
    /// Thread not found
    ThreadNotFound = 3001,
    /// PRIVATE threads are never merged or converted
    PrivateThreadImmutable = 3002,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Operation requires a pending reservation
    ReservationNotPending = 4002,
    /// Operation requires a confirmed reservation
    ReservationNotConfirmed = 4003,
    /// No table staged for this reservation
    TableNotSelected = 4004,
    /// No waitress assigned for seating
    WaitressNotAssigned = 4005,

    // ==================== 5xxx: Sale ====================
    /// Price list item not found
    PriceItemNotFound = 5001,

    // ==================== 7xxx: Table ====================
    /// Table already sat by another reservation
    TableOccupied = 7001,
    /// Table number outside the floor plan
    TableOutOfRange = 7002,

    // ==================== 8xxx: Member/Staff ====================
    /// Member not found
    MemberNotFound = 8001,
    /// Staff member not found
    StaffNotFound = 8002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Durable store write failed
    StorageFailed = 9002,
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ThreadNotFound => "Thread not found",
            ErrorCode::PrivateThreadImmutable => "Private threads cannot be moved or merged",
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationNotPending => "Reservation is not pending",
            ErrorCode::ReservationNotConfirmed => "Reservation is not confirmed",
            ErrorCode::TableNotSelected => "Select a table from the floor plan first",
            ErrorCode::WaitressNotAssigned => "Assign a waitress before marking as sat",
            ErrorCode::PriceItemNotFound => "Price item not found",
            ErrorCode::TableOccupied => "Table is already sat",
            ErrorCode::TableOutOfRange => "Table number outside the floor plan",
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageFailed => "Durable store write failed",
        }
    }

    /// Numeric value of this code
    pub fn value(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),
            7 => Ok(ErrorCode::ValueOutOfRange),
            2001 => Ok(ErrorCode::PermissionDenied),
            3001 => Ok(ErrorCode::ThreadNotFound),
            3002 => Ok(ErrorCode::PrivateThreadImmutable),
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::ReservationNotPending),
            4003 => Ok(ErrorCode::ReservationNotConfirmed),
            4004 => Ok(ErrorCode::TableNotSelected),
            4005 => Ok(ErrorCode::WaitressNotAssigned),
            5001 => Ok(ErrorCode::PriceItemNotFound),
            7001 => Ok(ErrorCode::TableOccupied),
            7002 => Ok(ErrorCode::TableOutOfRange),
            8001 => Ok(ErrorCode::MemberNotFound),
            8002 => Ok(ErrorCode::StaffNotFound),
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageFailed),
            _ => Err(format!("Unknown error code: {value}")),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_u16() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::TableOccupied,
            ErrorCode::ReservationNotPending,
            ErrorCode::StorageFailed,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        assert!(ErrorCode::try_from(65535).is_err());
    }
}
