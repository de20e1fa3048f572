//! Reservation domain types
//!
//! Shared between the core's lifecycle manager and host applications.

pub mod event;
pub mod types;

pub use event::{ReservationEvent, ReservationEventKind};
pub use types::{ManualReservationEntry, Reservation, ReservationIntake, ReservationStatus};
