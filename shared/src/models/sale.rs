//! Sale Model
//!
//! Produced by the sale pipeline; read-only log everywhere else.

use serde::{Deserialize, Serialize};

/// What was sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleType {
    Ticket,
    Table,
}

/// Sale status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    /// Logged at intake, awaiting seating/confirmation
    Pending,
    Confirmed,
}

/// Sale record
///
/// A pending sale logged at intake is replaced (same id) by the confirmed
/// record the pipeline writes at seating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub sale_type: SaleType,
    pub member_id: Option<i64>,
    pub member_name: String,
    pub member_phone: Option<String>,
    pub promoter_id: Option<i64>,
    pub promoter_name: Option<String>,
    pub event_name: String,
    pub date_key: String,
    pub table_assigned: Option<String>,
    pub waitress_name: Option<String>,
    pub party_size: u32,
    pub amount: f64,
    pub is_comp: bool,
    pub status: SaleStatus,
    pub purchased_at: i64,
}
