//! Message threads and the routing engine
//!
//! # Architecture
//!
//! ```text
//! member/staff send
//!     └─ ThreadsManager (validate, capability check)
//!           ├─ ThreadStore (find-or-create, append, member log)
//!           ├─ routing (visibility, recipient tables, display names)
//!           ├─ classify (keyword → tag)
//!           └─ broadcast ThreadEvent
//! ```
//!
//! Type drives delivery; tag drives the color label. The two are kept as
//! orthogonal fields and only rewritten together by an owner move.

pub mod capability;
pub mod classify;
pub mod manager;
pub mod routing;
pub mod store;

pub use capability::RoleCapabilities;
pub use classify::auto_classify;
pub use manager::{RoutingError, ThreadsManager};
pub use routing::{
    default_recipients_for_tag, default_recipients_for_type, default_thread_name_for_type,
    member_destinations, thread_visible, MemberDestination,
};
pub use store::ThreadStore;
