//! Thread store
//!
//! Owns the staff-side thread list and the per-member message logs. All
//! lookups go through the store; callers never hold references into the
//! collections. Mutations persist fire-and-forget.
//!
//! # Invariants enforced here
//!
//! - PRIVATE threads never merge with other threads; they are keyed by the
//!   (participant, owner) pair and addressed only by their own id.
//! - For non-PRIVATE types, at most one live thread exists per
//!   (member, type); later messages append to the existing thread.

use crate::db::Persist;
use parking_lot::RwLock;
use shared::models::{Member, StaffRole};
use shared::thread::{
    ParticipantKind, PrivateParticipant, SenderKind, SmsThread, ThreadMessage, ThreadTag,
    ThreadType,
};
use shared::util::now_millis;
use std::collections::HashMap;

use super::routing::{default_recipients_for_type, default_thread_name_for_type};

/// Light member identity for thread routing
///
/// The pipeline routes on sale attribution without loading the full member
/// row, so this carries only what thread creation needs.
#[derive(Debug, Clone)]
pub struct MemberRef {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
}

impl From<&Member> for MemberRef {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            phone: m.phone.clone(),
        }
    }
}

#[derive(Default)]
struct ThreadsInner {
    by_id: HashMap<String, SmsThread>,
    /// Insertion order, for stable inbox rendering
    order: Vec<String>,
}

/// Thread store (staff threads + member message logs)
pub struct ThreadStore {
    inner: RwLock<ThreadsInner>,
    member_logs: RwLock<HashMap<i64, Vec<ThreadMessage>>>,
    persist: Persist,
}

impl ThreadStore {
    pub fn new(persist: Persist) -> Self {
        Self {
            inner: RwLock::new(ThreadsInner::default()),
            member_logs: RwLock::new(HashMap::new()),
            persist,
        }
    }

    // ==================== Reads ====================

    pub fn get(&self, id: &str) -> Option<SmsThread> {
        self.inner.read().by_id.get(id).cloned()
    }

    pub fn all(&self) -> Vec<SmsThread> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect()
    }

    /// Live non-alert thread for (member, type), if any
    pub fn find_member_thread(&self, member_id: i64, thread_type: ThreadType) -> Option<String> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id))
            .find(|t| {
                t.member_id == Some(member_id) && !t.security_alert && t.thread_type == thread_type
            })
            .map(|t| t.id.clone())
    }

    /// PRIVATE thread keyed by a staff participant
    pub fn find_private_staff_thread(&self, staff_id: i64) -> Option<String> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id))
            .find(|t| {
                t.thread_type == ThreadType::Private
                    && matches!(
                        t.private_participant,
                        Some(PrivateParticipant { kind: ParticipantKind::Staff, id }) if id == staff_id
                    )
            })
            .map(|t| t.id.clone())
    }

    /// PRIVATE thread keyed by a member participant
    pub fn find_private_member_thread(&self, member_id: i64) -> Option<String> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id))
            .find(|t| {
                t.thread_type == ThreadType::Private
                    && t.member_id == Some(member_id)
                    && matches!(
                        t.private_participant,
                        Some(PrivateParticipant { kind: ParticipantKind::Member, .. })
                    )
            })
            .map(|t| t.id.clone())
    }

    // ==================== Writes ====================

    /// Register a fully-built thread
    pub fn insert(&self, thread: SmsThread) {
        self.persist.save_thread(&thread);
        let mut inner = self.inner.write();
        inner.order.push(thread.id.clone());
        inner.by_id.insert(thread.id.clone(), thread);
    }

    /// Mutate a thread in place; `false` when the id is unknown
    pub fn update(&self, id: &str, f: impl FnOnce(&mut SmsThread)) -> bool {
        let mut inner = self.inner.write();
        let Some(thread) = inner.by_id.get_mut(id) else {
            return false;
        };
        f(thread);
        let snapshot = thread.clone();
        drop(inner);
        self.persist.save_thread(&snapshot);
        true
    }

    /// Central routing helper: push a message into the correct staff thread
    ///
    /// PRIVATE routes to the member's own private thread and never merges;
    /// all other types find-or-create keyed by (member, type). Returns the
    /// thread id.
    pub fn push_to_staff_thread(
        &self,
        member: &MemberRef,
        text: &str,
        tag: ThreadTag,
        recipient_roles: Option<&[StaffRole]>,
        sender: SenderKind,
        force_type: Option<ThreadType>,
    ) -> String {
        let thread_type = force_type.unwrap_or(match tag {
            ThreadTag::Security => ThreadType::Security,
            ThreadTag::Floor => ThreadType::Floor,
            ThreadTag::Reservation => ThreadType::Reservation,
            ThreadTag::Management => ThreadType::Management,
            _ => ThreadType::General,
        });

        let message = ThreadMessage::new(sender, text);

        // PRIVATE threads: never merge with other threads
        if thread_type == ThreadType::Private {
            if let Some(id) = self.find_private_member_thread(member.id) {
                self.update(&id, |t| t.push_message(message));
                return id;
            }
            let thread = SmsThread {
                id: format!("PRIV-{}-{}", member.id, now_millis()),
                thread_type: ThreadType::Private,
                tag: ThreadTag::General,
                display_name: format!("Message with {}", member.name),
                member_id: Some(member.id),
                member_name: Some(member.name.clone()),
                member_phone: member.phone.clone(),
                private_participant: Some(PrivateParticipant {
                    kind: ParticipantKind::Member,
                    id: member.id,
                }),
                table_num: None,
                waitress_id: None,
                waitress_name: None,
                promoter_id: None,
                reservation_id: None,
                security_alert: false,
                recipient_roles: vec![StaffRole::Owner],
                messages: vec![message],
            };
            let id = thread.id.clone();
            self.insert(thread);
            return id;
        }

        // All other types: find or create keyed by member + type
        if let Some(id) = self.find_member_thread(member.id, thread_type) {
            self.update(&id, |t| {
                t.push_message(message);
                if let Some(roles) = recipient_roles {
                    t.add_recipients(roles);
                }
            });
            return id;
        }

        let roles = recipient_roles
            .map(|r| r.to_vec())
            .unwrap_or_else(|| default_recipients_for_type(thread_type));
        let thread = SmsThread {
            id: format!("M-{}-{}-{}", member.id, thread_type, now_millis()),
            thread_type,
            tag,
            display_name: default_thread_name_for_type(thread_type, Some(&member.name), None),
            member_id: Some(member.id),
            member_name: Some(member.name.clone()),
            member_phone: member.phone.clone(),
            private_participant: None,
            table_num: None,
            waitress_id: None,
            waitress_name: None,
            promoter_id: None,
            reservation_id: None,
            security_alert: thread_type == ThreadType::Security,
            recipient_roles: roles,
            messages: vec![message],
        };
        let id = thread.id.clone();
        self.insert(thread);
        id
    }

    // ==================== Member message log ====================

    /// Append to the member's personal (member-facing) message log
    pub fn append_member_log(&self, member_id: i64, message: ThreadMessage) {
        self.member_logs
            .write()
            .entry(member_id)
            .or_default()
            .push(message);
    }

    pub fn member_log(&self, member_id: i64) -> Vec<ThreadMessage> {
        self.member_logs
            .read()
            .get(&member_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ThreadStore {
        ThreadStore::new(Persist::noop())
    }

    fn member() -> MemberRef {
        MemberRef {
            id: 1,
            name: "Ava Chen".into(),
            phone: Some("555-0101".into()),
        }
    }

    #[test]
    fn same_member_and_type_appends_to_existing_thread() {
        let s = store();
        let m = member();
        let id1 = s.push_to_staff_thread(
            &m,
            "need a table",
            ThreadTag::Reservation,
            None,
            SenderKind::Member,
            None,
        );
        let id2 = s.push_to_staff_thread(
            &m,
            "for 4 people",
            ThreadTag::Reservation,
            None,
            SenderKind::Member,
            None,
        );
        assert_eq!(id1, id2);
        let thread = s.get(&id1).unwrap();
        assert_eq!(thread.messages.len(), 2);
        assert_eq!(thread.thread_type, ThreadType::Reservation);
    }

    #[test]
    fn private_thread_never_merges_with_typed_threads() {
        let s = store();
        let m = member();
        let general = s.push_to_staff_thread(
            &m,
            "hello",
            ThreadTag::General,
            None,
            SenderKind::Member,
            None,
        );
        let private = s.push_to_staff_thread(
            &m,
            "owner only",
            ThreadTag::General,
            Some(&[StaffRole::Owner]),
            SenderKind::Member,
            Some(ThreadType::Private),
        );
        assert_ne!(general, private);

        // A second private message lands in the same private thread
        let private2 = s.push_to_staff_thread(
            &m,
            "again",
            ThreadTag::General,
            None,
            SenderKind::Member,
            Some(ThreadType::Private),
        );
        assert_eq!(private, private2);
        assert_eq!(s.get(&private).unwrap().messages.len(), 2);
    }

    #[test]
    fn merge_expands_recipient_roles() {
        let s = store();
        let m = member();
        let id = s.push_to_staff_thread(
            &m,
            "first",
            ThreadTag::Management,
            Some(&[StaffRole::Owner]),
            SenderKind::Member,
            None,
        );
        s.push_to_staff_thread(
            &m,
            "second",
            ThreadTag::Management,
            Some(&[StaffRole::Manager, StaffRole::Owner]),
            SenderKind::Member,
            None,
        );
        let thread = s.get(&id).unwrap();
        assert!(thread.recipient_roles.contains(&StaffRole::Manager));
        // no duplicates
        assert_eq!(
            thread
                .recipient_roles
                .iter()
                .filter(|r| **r == StaffRole::Owner)
                .count(),
            1
        );
    }

    #[test]
    fn member_log_is_per_member() {
        let s = store();
        s.append_member_log(1, ThreadMessage::new(SenderKind::Staff, "hi"));
        s.append_member_log(2, ThreadMessage::new(SenderKind::Staff, "yo"));
        assert_eq!(s.member_log(1).len(), 1);
        assert_eq!(s.member_log(2).len(), 1);
        assert!(s.member_log(3).is_empty());
    }
}
