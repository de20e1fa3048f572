//! 9 AM follow-up scheduling
//!
//! Seating enqueues a durable job row (next-day 9:00 local); a single
//! recovery-safe worker fires due jobs — overdue ones immediately at
//! startup, the rest from a periodic loop. At-least-once across restarts
//! replaces the source's fire-and-forget single timer.

pub mod queue;
pub mod scheduler;

pub use queue::{next_fire_at, FollowUpQueue};
pub use scheduler::FollowUpScheduler;
