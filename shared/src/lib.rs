//! Shared types for the floor-server core
//!
//! Common types used across the core crate and host applications:
//! entity models, the unified error system, thread/reservation domain
//! types, and id/time utilities.

pub mod error;
pub mod models;
pub mod reservation;
pub mod thread;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::StaffRole;
pub use reservation::{Reservation, ReservationEvent, ReservationStatus};
pub use thread::{SmsThread, ThreadEvent, ThreadTag, ThreadType};
