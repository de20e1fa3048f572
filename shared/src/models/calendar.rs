//! Calendar annotation records
//!
//! The core writes annotation rows keyed by (date key, sale id); rendering
//! them is a host concern.

use serde::{Deserialize, Serialize};

/// Calendar entry tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarTag {
    Table,
    Ticket,
}

/// Calendar annotation for a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date_key: String,
    /// Headline, e.g. `Table 3 — Ava Chen`
    pub name: String,
    /// Secondary line, e.g. `4 guests · Neon Fridays · $450 · Dana`
    pub desc: String,
    pub tag: CalendarTag,
    pub member_id: Option<i64>,
    /// Replacement key together with `date_key`: stamping the same sale id
    /// again replaces this entry instead of accumulating
    pub sale_id: String,
    pub promoter_id: Option<i64>,
    /// Staff-only annotation, hidden from member calendars
    pub private: bool,
}
