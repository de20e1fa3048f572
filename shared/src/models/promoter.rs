//! Promoter Model

use serde::{Deserialize, Serialize};

/// Promoter entity (guest-list referrals)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promoter {
    pub id: i64,
    pub name: String,
    pub active: bool,
    /// Guest names added via this promoter's referral link
    pub guest_list: Vec<String>,
    /// Nights this promoter is working (date keys)
    pub nights: Vec<String>,
}
