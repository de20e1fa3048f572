//! In-memory durable store
//!
//! Backs tests and hosts that run without storage. Same upsert/delete
//! semantics as a real backend, held in plain maps.

use super::DurableStore;
use crate::audit::AuditEntry;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::error::AppResult;
use shared::models::{CalendarEntry, FollowUpJob, Member, Promoter, Sale, Staff};
use shared::reservation::Reservation;
use shared::thread::SmsThread;
use std::collections::HashMap;

#[derive(Default)]
struct Collections {
    members: HashMap<i64, Member>,
    staff: HashMap<i64, Staff>,
    promoters: HashMap<i64, Promoter>,
    reservations: HashMap<String, Reservation>,
    threads: HashMap<String, SmsThread>,
    sales: HashMap<String, Sale>,
    audit: Vec<AuditEntry>,
    /// Keyed by (date_key, sale_id)
    calendar: HashMap<(String, String), CalendarEntry>,
    follow_ups: HashMap<String, FollowUpJob>,
}

/// In-memory [`DurableStore`] implementation
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Test/host accessors ====================

    pub fn reservation(&self, id: &str) -> Option<Reservation> {
        self.inner.lock().reservations.get(id).cloned()
    }

    pub fn reservation_count(&self) -> usize {
        self.inner.lock().reservations.len()
    }

    pub fn thread(&self, id: &str) -> Option<SmsThread> {
        self.inner.lock().threads.get(id).cloned()
    }

    pub fn sale(&self, id: &str) -> Option<Sale> {
        self.inner.lock().sales.get(id).cloned()
    }

    pub fn calendar_entries(&self, date_key: &str) -> Vec<CalendarEntry> {
        self.inner
            .lock()
            .calendar
            .iter()
            .filter(|((d, _), _)| d == date_key)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.inner.lock().audit.clone()
    }

    pub fn follow_up_count(&self) -> usize {
        self.inner.lock().follow_ups.len()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn upsert_member(&self, member: Member) -> AppResult<()> {
        self.inner.lock().members.insert(member.id, member);
        Ok(())
    }

    async fn upsert_staff(&self, staff: Staff) -> AppResult<()> {
        self.inner.lock().staff.insert(staff.id, staff);
        Ok(())
    }

    async fn upsert_promoter(&self, promoter: Promoter) -> AppResult<()> {
        self.inner.lock().promoters.insert(promoter.id, promoter);
        Ok(())
    }

    async fn upsert_reservation(&self, reservation: Reservation) -> AppResult<()> {
        self.inner
            .lock()
            .reservations
            .insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn delete_reservation(&self, id: &str) -> AppResult<()> {
        self.inner.lock().reservations.remove(id);
        Ok(())
    }

    async fn upsert_thread(&self, thread: SmsThread) -> AppResult<()> {
        self.inner.lock().threads.insert(thread.id.clone(), thread);
        Ok(())
    }

    async fn upsert_sale(&self, sale: Sale) -> AppResult<()> {
        self.inner.lock().sales.insert(sale.id.clone(), sale);
        Ok(())
    }

    async fn append_audit(&self, entry: AuditEntry) -> AppResult<()> {
        self.inner.lock().audit.push(entry);
        Ok(())
    }

    async fn upsert_calendar_entry(&self, entry: CalendarEntry) -> AppResult<()> {
        self.inner
            .lock()
            .calendar
            .insert((entry.date_key.clone(), entry.sale_id.clone()), entry);
        Ok(())
    }

    async fn delete_calendar_entries(&self, date_key: &str, sale_id: &str) -> AppResult<()> {
        self.inner
            .lock()
            .calendar
            .remove(&(date_key.to_string(), sale_id.to_string()));
        Ok(())
    }

    async fn upsert_follow_up(&self, job: FollowUpJob) -> AppResult<()> {
        self.inner.lock().follow_ups.insert(job.id.clone(), job);
        Ok(())
    }

    async fn delete_follow_up(&self, id: &str) -> AppResult<()> {
        self.inner.lock().follow_ups.remove(id);
        Ok(())
    }

    async fn load_follow_ups(&self) -> AppResult<Vec<FollowUpJob>> {
        Ok(self.inner.lock().follow_ups.values().cloned().collect())
    }
}
