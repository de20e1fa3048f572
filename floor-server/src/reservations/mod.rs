//! Reservation lifecycle and the floor allocation view
//!
//! # State machine
//!
//! ```text
//! pending ──accept──▶ confirmed ──seat──▶ sat (terminal)
//!    │
//!    └──decline──▶ removed (terminal)
//! ```
//!
//! Seating a table is what converts the member's RESERVATION thread into a
//! FLOOR thread — the lifecycle and the routing engine are deliberately
//! coupled at that commit.

pub mod floor;
pub mod manager;

pub use floor::{floor_plan, table_status, FloorPlan, TableInfo, TableStatus};
pub use manager::{ReservationError, ReservationResult, ReservationsManager};
