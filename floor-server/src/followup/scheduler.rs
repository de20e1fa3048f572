//! 回访调度器
//!
//! 启动时补扫到期任务，运行期间按固定间隔轮询队列。
//!
//! Firing a job appends the interactive morning prompt to the member's
//! message log; responses are handled by the thread manager.

use std::sync::Arc;

use shared::thread::{SenderKind, ThreadMessage};
use shared::util::now_millis;
use tokio_util::sync::CancellationToken;

use crate::db::Persist;
use crate::threads::store::ThreadStore;

use super::queue::FollowUpQueue;

/// 回访调度器
///
/// Startup catch-up first (restores persisted rows, fires the overdue
/// ones), then the periodic loop until shutdown.
pub struct FollowUpScheduler {
    queue: Arc<FollowUpQueue>,
    threads: Arc<ThreadStore>,
    persist: Persist,
    shutdown: CancellationToken,
    tick_secs: u64,
}

impl FollowUpScheduler {
    pub fn new(
        queue: Arc<FollowUpQueue>,
        threads: Arc<ThreadStore>,
        persist: Persist,
        shutdown: CancellationToken,
        tick_secs: u64,
    ) -> Self {
        Self {
            queue,
            threads,
            persist,
            shutdown,
            tick_secs,
        }
    }

    /// 主循环：启动补扫 → 周期轮询
    pub async fn run(self) {
        tracing::info!("Follow-up scheduler started");

        // 1. 启动补扫
        self.catch_up().await;

        // 2. 周期循环
        self.periodic_loop().await;

        tracing::info!("Follow-up scheduler stopped");
    }

    /// 启动时恢复持久化任务并补发已到期的
    async fn catch_up(&self) {
        if let Some(store) = self.persist.store() {
            match store.load_follow_ups().await {
                Ok(jobs) => {
                    let count = jobs.len();
                    for job in jobs {
                        self.queue.restore(job);
                    }
                    if count > 0 {
                        tracing::info!(count, "Restored follow-up jobs from durable store");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load follow-up jobs, starting empty");
                }
            }
        }
        self.fire_due();
    }

    async fn periodic_loop(&self) {
        let tick = std::time::Duration::from_secs(self.tick_secs.max(1));
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(tick) => self.fire_due(),
            }
        }
    }

    /// Fire every due job: append the morning prompt to the member log
    fn fire_due(&self) {
        for job in self.queue.claim_due(now_millis()) {
            let first_name = job
                .member_name
                .split_whitespace()
                .next()
                .unwrap_or("there");
            let event_part = if !job.event_name.is_empty() && job.event_name != "tonight" {
                format!(" at {}", job.event_name)
            } else {
                " last night".to_string()
            };
            let text = format!(
                "Good morning, {first_name}! 🌟 We hope you had an incredible time with us{event_part}. \
                 It was truly a pleasure having you. We'd love to hear about your experience — your \
                 feedback means the world to us. How was your evening?"
            );
            let mut message = ThreadMessage::new(SenderKind::Staff, text);
            message.follow_up_prompt = true;
            self.threads.append_member_log(job.member_id, message);
            tracing::info!(job_id = %job.id, member_id = job.member_id, "Follow-up fired");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DurableStore, MemoryStore};
    use shared::models::FollowUpJob;

    #[tokio::test]
    async fn catch_up_fires_overdue_jobs_once() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_follow_up(FollowUpJob {
                id: "FU-1".into(),
                member_id: 1,
                member_name: "Ava Chen".into(),
                event_name: "Neon Fridays".into(),
                fire_at: now_millis() - 5_000,
            })
            .await
            .unwrap();

        let persist = Persist::new(store.clone());
        let queue = Arc::new(FollowUpQueue::new(persist.clone()));
        let threads = Arc::new(ThreadStore::new(Persist::noop()));
        let scheduler = FollowUpScheduler::new(
            queue.clone(),
            threads.clone(),
            persist,
            CancellationToken::new(),
            60,
        );

        scheduler.catch_up().await;

        let log = threads.member_log(1);
        assert_eq!(log.len(), 1);
        assert!(log[0].follow_up_prompt);
        assert!(log[0].text.contains("Good morning, Ava!"));
        assert!(log[0].text.contains("at Neon Fridays"));
        assert_eq!(queue.pending_count(), 0);

        // A second catch-up pass finds nothing to fire
        scheduler.catch_up().await;
        assert_eq!(threads.member_log(1).len(), 1);
    }

    #[tokio::test]
    async fn future_jobs_wait_for_their_fire_time() {
        let queue = Arc::new(FollowUpQueue::new(Persist::noop()));
        queue.schedule(2, "Jordan Reyes", "tonight", now_millis() + 60_000);
        let threads = Arc::new(ThreadStore::new(Persist::noop()));
        let scheduler = FollowUpScheduler::new(
            queue.clone(),
            threads.clone(),
            Persist::noop(),
            CancellationToken::new(),
            60,
        );

        scheduler.fire_due();
        assert!(threads.member_log(2).is_empty());
        assert_eq!(queue.pending_count(), 1);
    }

    #[tokio::test]
    async fn generic_event_name_reads_last_night() {
        let queue = Arc::new(FollowUpQueue::new(Persist::noop()));
        queue.schedule(3, "Sam", "tonight", now_millis() - 1);
        let threads = Arc::new(ThreadStore::new(Persist::noop()));
        let scheduler = FollowUpScheduler::new(
            queue.clone(),
            threads.clone(),
            Persist::noop(),
            CancellationToken::new(),
            60,
        );
        scheduler.fire_due();
        let log = threads.member_log(3);
        assert!(log[0].text.contains("last night"));
    }
}
