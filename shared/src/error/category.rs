//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 2xxx: Permission errors
/// - 3xxx: Thread errors
/// - 4xxx: Reservation errors
/// - 5xxx: Sale errors
/// - 7xxx: Table errors
/// - 8xxx: Member/staff errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Permission errors (2xxx)
    Permission,
    /// Thread errors (3xxx)
    Thread,
    /// Reservation errors (4xxx)
    Reservation,
    /// Sale errors (5xxx)
    Sale,
    /// Table errors (7xxx)
    Table,
    /// Member/staff errors (8xxx)
    People,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..2000 => Self::General,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Thread,
            4000..5000 => Self::Reservation,
            5000..6000 => Self::Sale,
            6000..8000 => Self::Table,
            8000..9000 => Self::People,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Permission => "permission",
            Self::Thread => "thread",
            Self::Reservation => "reservation",
            Self::Sale => "sale",
            Self::Table => "table",
            Self::People => "people",
            Self::System => "system",
        }
    }
}

impl From<ErrorCode> for ErrorCategory {
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_ranges_map_to_categories() {
        assert_eq!(
            ErrorCategory::from(ErrorCode::ValidationFailed),
            ErrorCategory::General
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::TableOccupied),
            ErrorCategory::Table
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::ReservationNotPending),
            ErrorCategory::Reservation
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::StorageFailed),
            ErrorCategory::System
        );
    }
}
