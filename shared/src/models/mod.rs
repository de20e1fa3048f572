//! Data models
//!
//! Entity rows shared between the core and host applications.
//! All entity IDs are snowflake-style `i64` (see [`crate::util::snowflake_id`]);
//! domain object IDs (threads, reservations, sales) are strings.

pub mod calendar;
pub mod follow_up;
pub mod member;
pub mod price_item;
pub mod promoter;
pub mod sale;
pub mod staff;

// Re-exports
pub use calendar::*;
pub use follow_up::*;
pub use member::*;
pub use price_item::*;
pub use promoter::*;
pub use sale::*;
pub use staff::*;
