//! Venue state - 持有所有服务的单例引用
//!
//! `VenueState` wires the stores and managers together and owns the
//! background task lifecycle. Arc fields make clones cheap; hosts keep one
//! state per venue process (multi-tenant support is a non-goal).
//!
//! # 服务组件
//!
//! | 字段 | 说明 |
//! |------|------|
//! | config | 配置项 (不可变) |
//! | roster | 会员/员工/推广员名册 |
//! | threads | 消息线程管理 (含可见性引擎) |
//! | reservations | 预订状态机 + 桌台视图 |
//! | pipeline | 销售与通知流水线 |
//! | followups | 回访任务队列 |
//! | audit | 审计日志服务 |

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::audit::{AuditLogRequest, AuditService, AuditWorker};
use crate::core::Config;
use crate::db::Persist;
use crate::followup::{FollowUpQueue, FollowUpScheduler};
use crate::reservations::ReservationsManager;
use crate::roster::RosterStore;
use crate::sales::{CalendarStore, PriceList, SalePipeline, SalesLog};
use crate::threads::{ThreadStore, ThreadsManager};

/// Venue state - all service singletons
#[derive(Clone)]
pub struct VenueState {
    pub config: Config,
    pub roster: Arc<RosterStore>,
    pub threads: Arc<ThreadsManager>,
    pub reservations: Arc<ReservationsManager>,
    pub pipeline: Arc<SalePipeline>,
    pub calendar: Arc<CalendarStore>,
    pub sales: Arc<SalesLog>,
    pub prices: Arc<PriceList>,
    pub followups: Arc<FollowUpQueue>,
    pub audit: Arc<AuditService>,
    persist: Persist,
    shutdown: CancellationToken,
    /// Receiver half for the audit worker, consumed by
    /// `start_background_tasks`
    audit_rx: Arc<Mutex<Option<mpsc::Receiver<AuditLogRequest>>>>,
}

impl std::fmt::Debug for VenueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VenueState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VenueState {
    /// Wire up every store and manager against one persistence handle
    pub fn new(config: Config, persist: Persist) -> Self {
        let roster = Arc::new(RosterStore::new(persist.clone()));
        let thread_store = Arc::new(ThreadStore::new(persist.clone()));
        let calendar = Arc::new(CalendarStore::new(persist.clone()));
        let sales = Arc::new(SalesLog::new(persist.clone()));
        let prices = Arc::new(PriceList::new());
        let followups = Arc::new(FollowUpQueue::new(persist.clone()));
        let (audit, audit_rx) = AuditService::new(config.audit_buffer);

        let pipeline = Arc::new(SalePipeline::new(
            thread_store.clone(),
            calendar.clone(),
            sales.clone(),
            roster.clone(),
            audit.clone(),
        ));
        let threads = Arc::new(ThreadsManager::new(
            thread_store.clone(),
            roster.clone(),
            audit.clone(),
            config.event_channel_capacity,
        ));
        let reservations = Arc::new(ReservationsManager::new(
            config.table_count,
            config.follow_up_hour,
            thread_store,
            roster.clone(),
            pipeline.clone(),
            calendar.clone(),
            sales.clone(),
            followups.clone(),
            prices.clone(),
            audit.clone(),
            persist.clone(),
            config.event_channel_capacity,
        ));

        Self {
            config,
            roster,
            threads,
            reservations,
            pipeline,
            calendar,
            sales,
            prices,
            followups,
            audit,
            persist,
            shutdown: CancellationToken::new(),
            audit_rx: Arc::new(Mutex::new(Some(audit_rx))),
        }
    }

    /// In-memory only state (tests, storage-less hosts)
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Persist::noop())
    }

    /// 启动后台任务：审计 worker + 回访调度器
    ///
    /// Call once from inside a tokio runtime.
    pub fn start_background_tasks(&self) {
        if let Some(rx) = self.audit_rx.lock().take() {
            if let Some(store) = self.persist.store() {
                let worker = AuditWorker::new(store.clone());
                tokio::spawn(worker.run(rx));
            }
            // Without a durable store the receiver is dropped and audit
            // entries silently discard
        }

        let scheduler = FollowUpScheduler::new(
            self.followups.clone(),
            self.threads.store().clone(),
            self.persist.clone(),
            self.shutdown.child_token(),
            self.config.follow_up_tick_secs,
        );
        tokio::spawn(scheduler.run());

        tracing::info!("Background tasks started");
    }

    /// Stop background tasks
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use shared::models::{MemberCreate, StaffCreate, StaffRole};
    use shared::reservation::ReservationIntake;

    #[tokio::test]
    async fn full_wiring_smoke() {
        let store = Arc::new(MemoryStore::new());
        let state = VenueState::new(Config::default(), Persist::new(store.clone()));
        state.start_background_tasks();

        let member = state.roster.add_member(MemberCreate {
            name: "Ava Chen".into(),
            phone: Some("555-0101".into()),
            email: None,
            notes: None,
        });
        let waitress = state.roster.add_staff(StaffCreate {
            name: "Dana".into(),
            role: StaffRole::Waitress,
            section: None,
        });

        let res = state
            .reservations
            .submit_request(ReservationIntake {
                member_id: Some(member.id),
                member_name: member.name.clone(),
                member_phone: member.phone.clone(),
                date_key: "2026-08-07".into(),
                event_name: "Neon Fridays".into(),
                party_size: 4,
                occasion: "Birthday".into(),
                notes: String::new(),
                referred_by_promoter: None,
            })
            .unwrap();
        state.reservations.accept(&res.id, None).unwrap();
        state.reservations.select_table(&res.id, 3).unwrap();
        state.reservations.seat(&res.id, Some(waitress.id)).unwrap();

        // fire-and-forget persistence lands once spawned tasks drain
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(store.reservation(&res.id).is_some());

        state.shutdown();
    }
}
