//! Price list
//!
//! Tickets and table minimums. The intake path prices a pending table sale
//! by party-size band; the owner can adjust prices at runtime.

use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use shared::models::PriceItem;

/// Price list store
pub struct PriceList {
    items: RwLock<Vec<PriceItem>>,
}

impl Default for PriceList {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceList {
    /// Seed with the standard menu
    pub fn new() -> Self {
        let items = vec![
            PriceItem {
                id: "ga-ticket".into(),
                label: "General Admission Ticket".into(),
                price: 20.0,
                active: true,
            },
            PriceItem {
                id: "vip-ticket".into(),
                label: "VIP Ticket".into(),
                price: 50.0,
                active: true,
            },
            PriceItem {
                id: "table-2".into(),
                label: "Table (2 guests)".into(),
                price: 150.0,
                active: true,
            },
            PriceItem {
                id: "table-4".into(),
                label: "Table (4 guests)".into(),
                price: 250.0,
                active: true,
            },
            PriceItem {
                id: "table-vip".into(),
                label: "VIP Table (6 guests)".into(),
                price: 450.0,
                active: true,
            },
        ];
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn items(&self) -> Vec<PriceItem> {
        self.items.read().clone()
    }

    pub fn price(&self, id: &str) -> Option<f64> {
        self.items
            .read()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.price)
    }

    /// Table price band for a party size: ≤2, ≤4, else VIP
    pub fn table_price_for_party(&self, party_size: u32) -> f64 {
        let id = if party_size <= 2 {
            "table-2"
        } else if party_size <= 4 {
            "table-4"
        } else {
            "table-vip"
        };
        self.price(id).unwrap_or(0.0)
    }

    /// Owner price update; rejects negative values
    pub fn set_price(&self, id: &str, price: f64) -> Result<PriceItem, AppError> {
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::validation("Enter a valid price"));
        }
        let mut items = self.items.write();
        let item = items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::new(ErrorCode::PriceItemNotFound))?;
        item.price = price;
        Ok(item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_size_bands() {
        let prices = PriceList::new();
        assert_eq!(prices.table_price_for_party(1), 150.0);
        assert_eq!(prices.table_price_for_party(2), 150.0);
        assert_eq!(prices.table_price_for_party(3), 250.0);
        assert_eq!(prices.table_price_for_party(4), 250.0);
        assert_eq!(prices.table_price_for_party(6), 450.0);
        assert_eq!(prices.table_price_for_party(12), 450.0);
    }

    #[test]
    fn set_price_validates() {
        let prices = PriceList::new();
        assert!(prices.set_price("ga-ticket", -5.0).is_err());
        assert!(prices.set_price("nope", 10.0).is_err());
        let updated = prices.set_price("ga-ticket", 25.0).unwrap();
        assert_eq!(updated.price, 25.0);
        assert_eq!(prices.price("ga-ticket"), Some(25.0));
    }
}
