//! ThreadsManager - thread operations and capability checks
//!
//! All staff/member messaging operations go through here:
//! capability checks first, then the store mutation, then an event
//! broadcast. Nothing here blocks on persistence.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use shared::models::{StaffRole, Viewer};
use shared::thread::{
    SenderKind, SmsThread, ThreadEvent, ThreadEventKind, ThreadMessage, ThreadTag, ThreadType,
};
use shared::util::{now_millis, time_label};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::audit::{AuditAction, AuditService};
use crate::roster::RosterStore;

use super::capability::RoleCapabilities;
use super::classify::auto_classify;
use super::routing::{
    default_recipients_for_tag, default_recipients_for_type, default_thread_name_for_type,
    member_destinations, thread_visible, MemberDestination,
};
use super::store::{MemberRef, ThreadStore};

/// Routing errors
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Member not found: {0}")]
    MemberNotFound(i64),

    #[error("Staff member not found: {0}")]
    StaffNotFound(i64),

    #[error("Unknown message destination: {0}")]
    UnknownDestination(String),

    #[error("Enter a message")]
    EmptyMessage,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Private threads cannot be moved or merged")]
    PrivateThreadImmutable,
}

impl From<RoutingError> for AppError {
    fn from(err: RoutingError) -> Self {
        let code = match &err {
            RoutingError::ThreadNotFound(_) => ErrorCode::ThreadNotFound,
            RoutingError::MemberNotFound(_) => ErrorCode::MemberNotFound,
            RoutingError::StaffNotFound(_) => ErrorCode::StaffNotFound,
            RoutingError::UnknownDestination(_) => ErrorCode::InvalidRequest,
            RoutingError::EmptyMessage => ErrorCode::RequiredField,
            RoutingError::PermissionDenied(_) => ErrorCode::PermissionDenied,
            RoutingError::PrivateThreadImmutable => ErrorCode::PrivateThreadImmutable,
        };
        AppError::with_message(code, err.to_string())
    }
}

pub type RoutingResult<T> = Result<T, RoutingError>;

/// ThreadsManager for messaging operations
pub struct ThreadsManager {
    store: Arc<ThreadStore>,
    roster: Arc<RosterStore>,
    audit: Arc<AuditService>,
    event_tx: broadcast::Sender<ThreadEvent>,
    /// Sequence suffix for alert ids within one millisecond
    alert_seq: RwLock<u32>,
}

impl ThreadsManager {
    pub fn new(
        store: Arc<ThreadStore>,
        roster: Arc<RosterStore>,
        audit: Arc<AuditService>,
        event_capacity: usize,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(event_capacity);
        Self {
            store,
            roster,
            audit,
            event_tx,
            alert_seq: RwLock::new(0),
        }
    }

    /// Subscribe to thread event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<ThreadEvent> {
        self.event_tx.subscribe()
    }

    pub fn store(&self) -> &Arc<ThreadStore> {
        &self.store
    }

    fn emit(&self, thread_id: &str, kind: ThreadEventKind) {
        let _ = self.event_tx.send(ThreadEvent::new(thread_id, kind));
    }

    // ==================== Queries ====================

    /// Threads visible to this viewer, in inbox order
    pub fn visible_threads(&self, viewer: &Viewer) -> Vec<SmsThread> {
        self.store
            .all()
            .into_iter()
            .filter(|t| thread_visible(t, viewer))
            .collect()
    }

    // ==================== Member sends ====================

    /// Member sends to one of the four compose destinations
    pub fn send_member_message(
        &self,
        member_id: i64,
        destination_id: &str,
        text: &str,
    ) -> RoutingResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoutingError::EmptyMessage);
        }
        let member = self
            .roster
            .member(member_id)
            .ok_or(RoutingError::MemberNotFound(member_id))?;
        let dest: &MemberDestination = member_destinations()
            .iter()
            .find(|d| d.id == destination_id)
            .ok_or_else(|| RoutingError::UnknownDestination(destination_id.to_string()))?;

        self.store
            .append_member_log(member_id, ThreadMessage::new(SenderKind::Member, text));

        let thread_id = self.store.push_to_staff_thread(
            &MemberRef::from(&member),
            text,
            dest.tag,
            Some(dest.recipient_roles),
            SenderKind::Member,
            Some(dest.thread_type),
        );
        tracing::info!(member_id, destination = dest.id, thread_id = %thread_id, "Member message routed");
        self.emit(&thread_id, ThreadEventKind::MessageAppended);
        Ok(thread_id)
    }

    /// Member free-text send: keyword classification picks the tag, the tag
    /// picks the thread type and default recipients
    pub fn send_member_quick_message(&self, member_id: i64, text: &str) -> RoutingResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoutingError::EmptyMessage);
        }
        let member = self
            .roster
            .member(member_id)
            .ok_or(RoutingError::MemberNotFound(member_id))?;
        let tag = auto_classify(text);

        self.store
            .append_member_log(member_id, ThreadMessage::new(SenderKind::Member, text));

        let thread_id = self.store.push_to_staff_thread(
            &MemberRef::from(&member),
            text,
            tag,
            None,
            SenderKind::Member,
            None,
        );
        tracing::info!(member_id, tag = %tag, thread_id = %thread_id, "Member quick message classified");
        self.emit(&thread_id, ThreadEventKind::MessageAppended);
        Ok(thread_id)
    }

    // ==================== Staff sends ====================

    /// Staff member writes the owner privately (find-or-create their
    /// PRIVATE thread)
    pub fn send_staff_owner_message(&self, staff_id: i64, text: &str) -> RoutingResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoutingError::EmptyMessage);
        }
        let staff = self
            .roster
            .staff(staff_id)
            .ok_or(RoutingError::StaffNotFound(staff_id))?;

        let message =
            ThreadMessage::new(SenderKind::StaffMember, text).with_sender_name(staff.name.clone());

        if let Some(id) = self.store.find_private_staff_thread(staff_id) {
            self.store.update(&id, |t| t.push_message(message));
            self.emit(&id, ThreadEventKind::MessageAppended);
            return Ok(id);
        }

        let thread = SmsThread {
            id: format!("PRIV-STAFF-{}-{}", staff_id, now_millis()),
            thread_type: ThreadType::Private,
            tag: ThreadTag::General,
            display_name: format!("Message with {}", staff.name),
            member_id: None,
            member_name: Some(staff.name.clone()),
            member_phone: None,
            private_participant: Some(shared::thread::PrivateParticipant {
                kind: shared::thread::ParticipantKind::Staff,
                id: staff_id,
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
        self.store.insert(thread);
        self.emit(
            &id,
            ThreadEventKind::Created {
                thread_type: ThreadType::Private,
            },
        );
        Ok(id)
    }

    /// Doorman raises a security alert thread
    pub fn send_security_alert(&self, text: &str) -> RoutingResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoutingError::EmptyMessage);
        }
        let now = now_millis();
        let seq = {
            let mut seq = self.alert_seq.write();
            *seq = seq.wrapping_add(1);
            *seq
        };
        let thread = SmsThread {
            id: format!("SEC-{}-{}", now, seq),
            thread_type: ThreadType::Security,
            tag: ThreadTag::Security,
            display_name: format!("Security Alert — {}", time_label(now)),
            member_id: None,
            member_name: Some("Security Alert".into()),
            member_phone: None,
            private_participant: None,
            table_num: None,
            waitress_id: None,
            waitress_name: None,
            promoter_id: None,
            reservation_id: None,
            security_alert: true,
            recipient_roles: default_recipients_for_type(ThreadType::Security),
            messages: vec![ThreadMessage::new(SenderKind::Staff, text)],
        };
        let id = thread.id.clone();
        self.store.insert(thread);
        tracing::warn!(thread_id = %id, "Security alert raised");
        self.emit(
            &id,
            ThreadEventKind::Created {
                thread_type: ThreadType::Security,
            },
        );
        Ok(id)
    }

    /// Staff reply into a visible thread; mirrors into the member's own log
    /// unless the thread is a staff-participant PRIVATE thread
    pub fn send_reply(&self, viewer: &Viewer, thread_id: &str, text: &str) -> RoutingResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoutingError::EmptyMessage);
        }
        let caps = RoleCapabilities::for_role(viewer.role);
        if !caps.can_reply {
            return Err(RoutingError::PermissionDenied(format!(
                "{} is read only",
                viewer.role.label()
            )));
        }

        let thread = self
            .store
            .get(thread_id)
            .ok_or_else(|| RoutingError::ThreadNotFound(thread_id.to_string()))?;

        self.store.update(thread_id, |t| {
            t.push_message(ThreadMessage::new(SenderKind::Staff, text));
        });

        // Mirror back into the member-facing log (never for staff-to-staff
        // private threads)
        let staff_participant = matches!(
            thread.private_participant,
            Some(shared::thread::PrivateParticipant {
                kind: shared::thread::ParticipantKind::Staff,
                ..
            })
        );
        if let Some(member_id) = thread.member_id {
            if !staff_participant {
                self.store
                    .append_member_log(member_id, ThreadMessage::new(SenderKind::Staff, text));
            }
        }

        self.emit(thread_id, ThreadEventKind::MessageAppended);
        Ok(())
    }

    /// Owner opens (or continues) a PRIVATE thread with a member
    pub fn owner_compose_to_member(&self, member_id: i64, text: &str) -> RoutingResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoutingError::EmptyMessage);
        }
        let member = self
            .roster
            .member(member_id)
            .ok_or(RoutingError::MemberNotFound(member_id))?;

        self.store
            .append_member_log(member_id, ThreadMessage::new(SenderKind::Staff, text));
        let thread_id = self.store.push_to_staff_thread(
            &MemberRef::from(&member),
            text,
            ThreadTag::General,
            Some(&[StaffRole::Owner]),
            SenderKind::Staff,
            Some(ThreadType::Private),
        );
        self.emit(&thread_id, ThreadEventKind::MessageAppended);
        Ok(thread_id)
    }

    /// Owner opens (or continues) a PRIVATE thread with a staff member
    pub fn owner_compose_to_staff(&self, staff_id: i64, text: &str) -> RoutingResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoutingError::EmptyMessage);
        }
        let staff = self
            .roster
            .staff(staff_id)
            .ok_or(RoutingError::StaffNotFound(staff_id))?;

        if let Some(id) = self.store.find_private_staff_thread(staff_id) {
            self.store
                .update(&id, |t| t.push_message(ThreadMessage::new(SenderKind::Staff, text)));
            self.emit(&id, ThreadEventKind::MessageAppended);
            return Ok(id);
        }

        let thread = SmsThread {
            id: format!("PRIV-STAFF-{}-{}", staff_id, now_millis()),
            thread_type: ThreadType::Private,
            tag: ThreadTag::General,
            display_name: format!("Message with {}", staff.name),
            member_id: None,
            member_name: Some(staff.name.clone()),
            member_phone: None,
            private_participant: Some(shared::thread::PrivateParticipant {
                kind: shared::thread::ParticipantKind::Staff,
                id: staff_id,
            }),
            table_num: None,
            waitress_id: None,
            waitress_name: None,
            promoter_id: None,
            reservation_id: None,
            security_alert: false,
            recipient_roles: vec![StaffRole::Owner],
            messages: vec![ThreadMessage::new(SenderKind::Staff, text)],
        };
        let id = thread.id.clone();
        self.store.insert(thread);
        self.emit(
            &id,
            ThreadEventKind::Created {
                thread_type: ThreadType::Private,
            },
        );
        Ok(id)
    }

    // ==================== Re-routing ====================

    /// Owner re-route: rewrites type, tag, recipients, display name and the
    /// alert flag. `table_num`/`waitress_id` persist through the move.
    pub fn move_thread(
        &self,
        viewer: &Viewer,
        thread_id: &str,
        new_type: ThreadType,
    ) -> RoutingResult<()> {
        let caps = RoleCapabilities::for_role(viewer.role);
        if !caps.can_move {
            return Err(RoutingError::PermissionDenied(
                "Only the owner can move threads".into(),
            ));
        }
        let thread = self
            .store
            .get(thread_id)
            .ok_or_else(|| RoutingError::ThreadNotFound(thread_id.to_string()))?;
        if thread.thread_type == ThreadType::Private || new_type == ThreadType::Private {
            return Err(RoutingError::PrivateThreadImmutable);
        }

        self.store.update(thread_id, |t| {
            t.thread_type = new_type;
            t.tag = ThreadTag::from(new_type);
            t.security_alert = new_type == ThreadType::Security;
            t.recipient_roles = default_recipients_for_type(new_type);
            t.display_name = default_thread_name_for_type(
                new_type,
                t.member_name.as_deref(),
                t.table_num.as_deref(),
            );
        });

        self.audit.log(
            AuditAction::ThreadMoved,
            "thread",
            thread_id,
            viewer.staff_id,
            None,
            serde_json::json!({ "new_type": new_type }),
        );
        tracing::info!(thread_id, %new_type, "Thread moved");
        self.emit(thread_id, ThreadEventKind::Moved { new_type });
        Ok(())
    }

    /// Manager/VIP-host display retag: tag + recipients from the tag table,
    /// type untouched
    pub fn retag_thread(
        &self,
        viewer: &Viewer,
        thread_id: &str,
        new_tag: ThreadTag,
    ) -> RoutingResult<()> {
        let caps = RoleCapabilities::for_role(viewer.role);
        if !caps.can_retag {
            return Err(RoutingError::PermissionDenied(
                "Only manager and VIP host can retag threads".into(),
            ));
        }
        if self.store.get(thread_id).is_none() {
            return Err(RoutingError::ThreadNotFound(thread_id.to_string()));
        }

        self.store.update(thread_id, |t| {
            t.tag = new_tag;
            t.security_alert = new_tag == ThreadTag::Security;
            t.recipient_roles = default_recipients_for_tag(new_tag);
        });

        self.audit.log(
            AuditAction::ThreadRetagged,
            "thread",
            thread_id,
            viewer.staff_id,
            None,
            serde_json::json!({ "new_tag": new_tag }),
        );
        self.emit(thread_id, ThreadEventKind::Retagged { new_tag });
        Ok(())
    }

    // ==================== Follow-up responses ====================

    /// Member answers the morning follow-up prompt.
    ///
    /// Positive: a note is routed to the MANAGEMENT thread and the member
    /// log closes with a thank-you. Otherwise the owner PRIVATE composition
    /// context is returned for the host to open.
    pub fn respond_to_follow_up(
        &self,
        member_id: i64,
        positive: bool,
    ) -> RoutingResult<Option<&'static MemberDestination>> {
        let member = self
            .roster
            .member(member_id)
            .ok_or(RoutingError::MemberNotFound(member_id))?;

        if positive {
            self.store.append_member_log(
                member_id,
                ThreadMessage::new(SenderKind::Member, "⭐ Positive feedback — had a great time!"),
            );
            let thread_id = self.store.push_to_staff_thread(
                &MemberRef::from(&member),
                "Positive experience feedback from member — no action needed.",
                ThreadTag::Management,
                Some(&[StaffRole::Owner, StaffRole::Manager, StaffRole::VipHost]),
                SenderKind::Member,
                None,
            );
            self.store.append_member_log(
                member_id,
                ThreadMessage::new(
                    SenderKind::Staff,
                    "Thank you so much! Your kind words mean everything to us. We look forward to seeing you again soon. 🥂",
                ),
            );
            self.emit(&thread_id, ThreadEventKind::MessageAppended);
            Ok(None)
        } else {
            self.store.append_member_log(
                member_id,
                ThreadMessage::new(
                    SenderKind::Staff,
                    "Of course — the owner is here to listen. Please share what's on your mind and we'll make it right.",
                ),
            );
            let owner_dest = member_destinations()
                .iter()
                .find(|d| d.id == "owner")
                .expect("owner destination is always present");
            Ok(Some(owner_dest))
        }
    }
}
