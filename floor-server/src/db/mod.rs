//! Durable store boundary
//!
//! The core's source of truth is the in-memory stores; durability is a
//! narrow CRUD interface over five collections (members, staff/promoters,
//! reservations, threads, sales/audit) plus calendar annotations and
//! follow-up jobs. No wire format is defined here — hosts bring their own
//! backend and implement [`DurableStore`].
//!
//! # Failure policy
//!
//! Writes go through [`Persist`], which spawns each call and swallows
//! failures after logging them. A failed write never rolls back or blocks
//! the in-memory mutation; the session view always reflects the attempted
//! change.

pub mod memory;

pub use memory::MemoryStore;

use crate::audit::AuditEntry;
use async_trait::async_trait;
use shared::error::AppResult;
use shared::models::{CalendarEntry, FollowUpJob, Member, Promoter, Sale, Staff};
use shared::reservation::Reservation;
use shared::thread::SmsThread;
use std::sync::Arc;

/// CRUD interface to a durable backend
///
/// Upserts replace by id; deletes are by id and idempotent.
#[async_trait]
pub trait DurableStore: Send + Sync {
    // ==================== People ====================
    async fn upsert_member(&self, member: Member) -> AppResult<()>;
    async fn upsert_staff(&self, staff: Staff) -> AppResult<()>;
    async fn upsert_promoter(&self, promoter: Promoter) -> AppResult<()>;

    // ==================== Reservations ====================
    async fn upsert_reservation(&self, reservation: Reservation) -> AppResult<()>;
    async fn delete_reservation(&self, id: &str) -> AppResult<()>;

    // ==================== Threads ====================
    async fn upsert_thread(&self, thread: SmsThread) -> AppResult<()>;

    // ==================== Sales / Audit ====================
    async fn upsert_sale(&self, sale: Sale) -> AppResult<()>;
    async fn append_audit(&self, entry: AuditEntry) -> AppResult<()>;

    // ==================== Calendar ====================
    async fn upsert_calendar_entry(&self, entry: CalendarEntry) -> AppResult<()>;
    async fn delete_calendar_entries(&self, date_key: &str, sale_id: &str) -> AppResult<()>;

    // ==================== Follow-up jobs ====================
    async fn upsert_follow_up(&self, job: FollowUpJob) -> AppResult<()>;
    async fn delete_follow_up(&self, id: &str) -> AppResult<()>;
    /// Pending jobs, for scheduler recovery at startup
    async fn load_follow_ups(&self) -> AppResult<Vec<FollowUpJob>>;
}

/// Fire-and-forget persistence handle
///
/// Wraps an optional [`DurableStore`]; every write is spawned and failures
/// degrade to a `warn` log. Without a configured store (or outside a tokio
/// runtime, as in sync tests) writes are skipped.
#[derive(Clone, Default)]
pub struct Persist {
    store: Option<Arc<dyn DurableStore>>,
}

impl std::fmt::Debug for Persist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persist")
            .field("configured", &self.store.is_some())
            .finish()
    }
}

impl Persist {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store: Some(store) }
    }

    /// No durable backend; every write is a no-op
    pub fn noop() -> Self {
        Self { store: None }
    }

    pub fn store(&self) -> Option<&Arc<dyn DurableStore>> {
        self.store.as_ref()
    }

    fn spawn<F>(&self, what: &'static str, fut: F)
    where
        F: std::future::Future<Output = AppResult<()>> + Send + 'static,
    {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::debug!(what, "No async runtime — durable write skipped");
            return;
        }
        tokio::spawn(async move {
            if let Err(e) = fut.await {
                tracing::warn!(what, error = %e, "Durable store write failed (state kept in memory)");
            }
        });
    }

    pub fn save_member(&self, member: &Member) {
        if let Some(store) = self.store.clone() {
            let member = member.clone();
            self.spawn("member", async move { store.upsert_member(member).await });
        }
    }

    pub fn save_staff(&self, staff: &Staff) {
        if let Some(store) = self.store.clone() {
            let staff = staff.clone();
            self.spawn("staff", async move { store.upsert_staff(staff).await });
        }
    }

    pub fn save_promoter(&self, promoter: &Promoter) {
        if let Some(store) = self.store.clone() {
            let promoter = promoter.clone();
            self.spawn("promoter", async move {
                store.upsert_promoter(promoter).await
            });
        }
    }

    pub fn save_reservation(&self, reservation: &Reservation) {
        if let Some(store) = self.store.clone() {
            let reservation = reservation.clone();
            self.spawn("reservation", async move {
                store.upsert_reservation(reservation).await
            });
        }
    }

    pub fn remove_reservation(&self, id: &str) {
        if let Some(store) = self.store.clone() {
            let id = id.to_string();
            self.spawn("reservation-delete", async move {
                store.delete_reservation(&id).await
            });
        }
    }

    pub fn save_thread(&self, thread: &SmsThread) {
        if let Some(store) = self.store.clone() {
            let thread = thread.clone();
            self.spawn("thread", async move { store.upsert_thread(thread).await });
        }
    }

    pub fn save_sale(&self, sale: &Sale) {
        if let Some(store) = self.store.clone() {
            let sale = sale.clone();
            self.spawn("sale", async move { store.upsert_sale(sale).await });
        }
    }

    pub fn save_calendar_entry(&self, entry: &CalendarEntry) {
        if let Some(store) = self.store.clone() {
            let entry = entry.clone();
            self.spawn("calendar", async move {
                store.upsert_calendar_entry(entry).await
            });
        }
    }

    pub fn remove_calendar_entries(&self, date_key: &str, sale_id: &str) {
        if let Some(store) = self.store.clone() {
            let date_key = date_key.to_string();
            let sale_id = sale_id.to_string();
            self.spawn("calendar-delete", async move {
                store.delete_calendar_entries(&date_key, &sale_id).await
            });
        }
    }

    pub fn save_follow_up(&self, job: &FollowUpJob) {
        if let Some(store) = self.store.clone() {
            let job = job.clone();
            self.spawn("follow-up", async move { store.upsert_follow_up(job).await });
        }
    }

    pub fn remove_follow_up(&self, id: &str) {
        if let Some(store) = self.store.clone() {
            let id = id.to_string();
            self.spawn("follow-up-delete", async move {
                store.delete_follow_up(&id).await
            });
        }
    }
}
