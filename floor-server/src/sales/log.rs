//! Sales log
//!
//! Append-style log keyed by sale id: re-recording a sale id replaces the
//! prior row (a pending intake sale is upgraded by the confirmed record the
//! pipeline writes at seating).

use crate::db::Persist;
use parking_lot::RwLock;
use shared::models::{Sale, SaleType};
use std::collections::HashMap;

/// Sales log store
pub struct SalesLog {
    by_id: RwLock<HashMap<String, Sale>>,
    order: RwLock<Vec<String>>,
    persist: Persist,
}

impl SalesLog {
    pub fn new(persist: Persist) -> Self {
        Self {
            by_id: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            persist,
        }
    }

    /// Insert or replace by sale id
    pub fn record(&self, sale: Sale) {
        self.persist.save_sale(&sale);
        let mut by_id = self.by_id.write();
        if by_id.insert(sale.id.clone(), sale.clone()).is_none() {
            self.order.write().push(sale.id);
        }
    }

    pub fn get(&self, id: &str) -> Option<Sale> {
        self.by_id.read().get(id).cloned()
    }

    pub fn all(&self) -> Vec<Sale> {
        let by_id = self.by_id.read();
        self.order
            .read()
            .iter()
            .filter_map(|id| by_id.get(id).cloned())
            .collect()
    }

    /// Latest sale for a member of a given type (seat() carries amount/comp
    /// over from this)
    pub fn find_for_member(&self, member_id: i64, sale_type: SaleType) -> Option<Sale> {
        let by_id = self.by_id.read();
        self.order
            .read()
            .iter()
            .filter_map(|id| by_id.get(id))
            .find(|s| s.member_id == Some(member_id) && s.sale_type == sale_type)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::SaleStatus;
    use shared::util::now_millis;

    fn sale(id: &str, member_id: i64, amount: f64, status: SaleStatus) -> Sale {
        Sale {
            id: id.into(),
            sale_type: SaleType::Table,
            member_id: Some(member_id),
            member_name: "Ava Chen".into(),
            member_phone: None,
            promoter_id: None,
            promoter_name: None,
            event_name: "Neon Fridays".into(),
            date_key: "2026-08-07".into(),
            table_assigned: None,
            waitress_name: None,
            party_size: 4,
            amount,
            is_comp: false,
            status,
            purchased_at: now_millis(),
        }
    }

    #[test]
    fn same_id_replaces_instead_of_duplicating() {
        let log = SalesLog::new(Persist::noop());
        log.record(sale("RES1", 1, 250.0, SaleStatus::Pending));
        log.record(sale("RES1", 1, 250.0, SaleStatus::Confirmed));
        assert_eq!(log.all().len(), 1);
        assert_eq!(log.get("RES1").unwrap().status, SaleStatus::Confirmed);
    }

    #[test]
    fn find_for_member_matches_type() {
        let log = SalesLog::new(Persist::noop());
        log.record(sale("RES1", 1, 250.0, SaleStatus::Pending));
        assert!(log.find_for_member(1, SaleType::Table).is_some());
        assert!(log.find_for_member(1, SaleType::Ticket).is_none());
        assert!(log.find_for_member(2, SaleType::Table).is_none());
    }
}
