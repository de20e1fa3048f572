//! Calendar annotation store
//!
//! Entries are keyed by (date key, sale id); stamping the same sale twice
//! replaces the entry. Rendering is a host concern.

use crate::db::Persist;
use parking_lot::RwLock;
use shared::models::CalendarEntry;
use std::collections::HashMap;

/// Calendar store (date key → entries)
pub struct CalendarStore {
    by_date: RwLock<HashMap<String, Vec<CalendarEntry>>>,
    persist: Persist,
}

impl CalendarStore {
    pub fn new(persist: Persist) -> Self {
        Self {
            by_date: RwLock::new(HashMap::new()),
            persist,
        }
    }

    /// Idempotent stamp: any prior entry for this sale id on the date is
    /// dropped before the fresh entry is appended
    pub fn stamp(&self, entry: CalendarEntry) {
        self.persist
            .remove_calendar_entries(&entry.date_key, &entry.sale_id);
        self.persist.save_calendar_entry(&entry);
        let mut by_date = self.by_date.write();
        let entries = by_date.entry(entry.date_key.clone()).or_default();
        entries.retain(|e| e.sale_id != entry.sale_id);
        entries.push(entry);
    }

    /// Remove every entry carrying this sale id on the date (decline path)
    pub fn remove(&self, date_key: &str, sale_id: &str) {
        self.persist.remove_calendar_entries(date_key, sale_id);
        if let Some(entries) = self.by_date.write().get_mut(date_key) {
            entries.retain(|e| e.sale_id != sale_id);
        }
    }

    pub fn entries_for(&self, date_key: &str) -> Vec<CalendarEntry> {
        self.by_date
            .read()
            .get(date_key)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CalendarTag;

    fn entry(sale_id: &str, name: &str) -> CalendarEntry {
        CalendarEntry {
            date_key: "2026-08-07".into(),
            name: name.into(),
            desc: String::new(),
            tag: CalendarTag::Table,
            member_id: Some(1),
            sale_id: sale_id.into(),
            promoter_id: None,
            private: true,
        }
    }

    #[test]
    fn stamping_twice_replaces() {
        let cal = CalendarStore::new(Persist::noop());
        cal.stamp(entry("RES1", "Table TBD — Ava Chen"));
        cal.stamp(entry("RES1", "Table 3 — Ava Chen"));
        let entries = cal.entries_for("2026-08-07");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Table 3 — Ava Chen");
    }

    #[test]
    fn remove_clears_sale_entries_only() {
        let cal = CalendarStore::new(Persist::noop());
        cal.stamp(entry("RES1", "a"));
        cal.stamp(entry("RES2", "b"));
        cal.remove("2026-08-07", "RES1");
        let entries = cal.entries_for("2026-08-07");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sale_id, "RES2");
    }
}
