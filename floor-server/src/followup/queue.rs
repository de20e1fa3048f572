//! Follow-up job queue
//!
//! In-memory rows with fire-and-forget persistence; the scheduler reloads
//! persisted rows at startup for catch-up.

use crate::db::Persist;
use chrono::{DateTime, Duration, Local, TimeZone};
use parking_lot::RwLock;
use shared::models::FollowUpJob;
use std::collections::HashMap;

/// Fire time for a follow-up scheduled at `now`: next-day `hour`:00 local.
///
/// Always the following day — a party seated at 3 AM still gets the message
/// the coming morning, not within the same night.
pub fn next_fire_at(now: DateTime<Local>, hour: u32) -> i64 {
    let next_day = now.date_naive() + Duration::days(1);
    let naive = next_day.and_hms_opt(hour, 0, 0).expect("hour is validated at config load");
    match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt.timestamp_millis(),
        // DST edge: take the earliest valid instant, else shift an hour
        chrono::LocalResult::Ambiguous(a, _) => a.timestamp_millis(),
        chrono::LocalResult::None => {
            let shifted = next_day.and_hms_opt(hour + 1, 0, 0).unwrap_or(naive);
            Local
                .from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.timestamp_millis())
                .unwrap_or_else(|| now.timestamp_millis() + Duration::days(1).num_milliseconds())
        }
    }
}

/// Follow-up job store
pub struct FollowUpQueue {
    jobs: RwLock<HashMap<String, FollowUpJob>>,
    persist: Persist,
}

impl FollowUpQueue {
    pub fn new(persist: Persist) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            persist,
        }
    }

    /// Enqueue a follow-up for a member
    pub fn schedule(
        &self,
        member_id: i64,
        member_name: &str,
        event_name: &str,
        fire_at: i64,
    ) -> FollowUpJob {
        let job = FollowUpJob {
            id: format!("FU-{}-{}", member_id, fire_at),
            member_id,
            member_name: member_name.to_string(),
            event_name: event_name.to_string(),
            fire_at,
        };
        tracing::info!(job_id = %job.id, fire_at, "Follow-up scheduled");
        self.persist.save_follow_up(&job);
        self.jobs.write().insert(job.id.clone(), job.clone());
        job
    }

    /// Re-register a persisted row (startup recovery)
    pub fn restore(&self, job: FollowUpJob) {
        self.jobs.write().insert(job.id.clone(), job);
    }

    /// Jobs due at `now`, removed from the queue as they are claimed
    pub fn claim_due(&self, now: i64) -> Vec<FollowUpJob> {
        let mut jobs = self.jobs.write();
        let due_ids: Vec<String> = jobs
            .values()
            .filter(|j| j.fire_at <= now)
            .map(|j| j.id.clone())
            .collect();
        let due: Vec<FollowUpJob> = due_ids.iter().filter_map(|id| jobs.remove(id)).collect();
        drop(jobs);
        for job in &due {
            self.persist.remove_follow_up(&job.id);
        }
        due
    }

    pub fn pending(&self) -> Vec<FollowUpJob> {
        self.jobs.read().values().cloned().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.jobs.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::util::now_millis;

    #[test]
    fn fire_time_is_next_day_at_hour() {
        let now = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2026, 8, 7)
                    .unwrap()
                    .and_hms_opt(23, 30, 0)
                    .unwrap(),
            )
            .single()
            .unwrap();
        let fire = next_fire_at(now, 9);
        let fired = Local.timestamp_millis_opt(fire).single().unwrap();
        assert_eq!(fired.date_naive(), NaiveDate::from_ymd_opt(2026, 8, 8).unwrap());
        assert_eq!(fired.format("%H:%M").to_string(), "09:00");
    }

    #[test]
    fn early_morning_seating_still_fires_next_day() {
        // 3 AM seating → tomorrow 9 AM, not today's
        let now = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2026, 8, 7)
                    .unwrap()
                    .and_hms_opt(3, 0, 0)
                    .unwrap(),
            )
            .single()
            .unwrap();
        let fire = next_fire_at(now, 9);
        let fired = Local.timestamp_millis_opt(fire).single().unwrap();
        assert_eq!(fired.date_naive(), NaiveDate::from_ymd_opt(2026, 8, 8).unwrap());
    }

    #[test]
    fn claim_due_removes_claimed_jobs() {
        let queue = FollowUpQueue::new(Persist::noop());
        let now = now_millis();
        queue.schedule(1, "Ava Chen", "Neon Fridays", now - 1_000);
        queue.schedule(2, "Jordan Reyes", "Neon Fridays", now + 60_000);

        let due = queue.claim_due(now);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].member_id, 1);
        assert_eq!(queue.pending_count(), 1);

        // Claimed once — not claimable again
        assert!(queue.claim_due(now).is_empty());
    }
}
