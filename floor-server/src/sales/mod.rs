//! Sales, comps and the notification pipeline
//!
//! # Architecture
//!
//! ```text
//! seat() / issue_comp()
//!     └─ SalePipeline::record_seating_or_comp(sale)
//!           ├─ 1. calendar stamp (replace by sale id, never accumulate)
//!           ├─ 2. member notification (4 templates: table/ticket × comp/paid)
//!           └─ 3. RESERVATION thread mirror (+ table/promoter metadata)
//! ```

pub mod calendar;
pub mod log;
pub mod pipeline;
pub mod pricing;

pub use calendar::CalendarStore;
pub use log::SalesLog;
pub use pipeline::{CompKind, SalePipeline};
pub use pricing::PriceList;
