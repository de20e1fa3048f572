//! Price List Model

use serde::{Deserialize, Serialize};

/// Price list row (tickets and table minimums)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceItem {
    /// Stable key, e.g. `ga-ticket`, `table-2`, `table-4`, `table-vip`
    pub id: String,
    pub label: String,
    pub price: f64,
    pub active: bool,
}
