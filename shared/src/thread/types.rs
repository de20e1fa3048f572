//! Thread types
//!
//! Thread taxonomy:
//! - PRIVATE: only owner + one specific member or staff participant
//! - RESERVATION: owner + manager + vip-host (pre-sat)
//! - FLOOR: owner + assigned waitress + all barbacks (post-sat)
//! - SECURITY: owner + doorman + manager + vip-host
//! - MANAGEMENT: owner + manager + vip-host
//! - GENERAL: owner only — catch-all

use crate::models::StaffRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural thread category — drives delivery and visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadType {
    Private,
    Reservation,
    Floor,
    Security,
    Management,
    General,
}

impl fmt::Display for ThreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThreadType::Private => "PRIVATE",
            ThreadType::Reservation => "RESERVATION",
            ThreadType::Floor => "FLOOR",
            ThreadType::Security => "SECURITY",
            ThreadType::Management => "MANAGEMENT",
            ThreadType::General => "GENERAL",
        };
        f.write_str(s)
    }
}

/// Display classification — color label only, independent from type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadTag {
    General,
    Reservation,
    Vip,
    Floor,
    Security,
    Management,
}

impl ThreadTag {
    /// Display color (hex), host renders the pill
    pub fn color(&self) -> &'static str {
        match self {
            ThreadTag::General => "#888888",
            ThreadTag::Reservation => "#A78BFA",
            ThreadTag::Vip => "#D4AF37",
            ThreadTag::Floor => "#34D399",
            ThreadTag::Security => "#EF4444",
            ThreadTag::Management => "#60A5FA",
        }
    }
}

impl fmt::Display for ThreadTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThreadTag::General => "GENERAL",
            ThreadTag::Reservation => "RESERVATION",
            ThreadTag::Vip => "VIP",
            ThreadTag::Floor => "FLOOR",
            ThreadTag::Security => "SECURITY",
            ThreadTag::Management => "MANAGEMENT",
        };
        f.write_str(s)
    }
}

impl From<ThreadType> for ThreadTag {
    /// Canonical tag for a type (used when a move rewrites both)
    fn from(t: ThreadType) -> Self {
        match t {
            ThreadType::Private => ThreadTag::General,
            ThreadType::Reservation => ThreadTag::Reservation,
            ThreadType::Floor => ThreadTag::Floor,
            ThreadType::Security => ThreadTag::Security,
            ThreadType::Management => ThreadTag::Management,
            ThreadType::General => ThreadTag::General,
        }
    }
}

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SenderKind {
    /// The member the thread belongs to
    Member,
    /// Staff replying from the venue side
    Staff,
    /// A staff member writing as themselves (staff → owner private threads)
    StaffMember,
    /// System-generated team note
    Internal,
}

/// Private-thread participant kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantKind {
    Member,
    Staff,
}

/// The one non-owner party of a PRIVATE thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateParticipant {
    pub kind: ParticipantKind,
    pub id: i64,
}

/// Single message in a thread (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub sender: SenderKind,
    pub text: String,
    /// Unix millis
    pub sent_at: i64,
    /// Sender display name snapshot (staff-member messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// Interactive follow-up prompt (two response options)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub follow_up_prompt: bool,
}

impl ThreadMessage {
    pub fn new(sender: SenderKind, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            sent_at: crate::util::now_millis(),
            sender_name: None,
            follow_up_prompt: false,
        }
    }

    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }
}

/// Conversation thread (staff-side inbox entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsThread {
    pub id: String,
    pub thread_type: ThreadType,
    pub tag: ThreadTag,
    /// Canonical display name, regenerated on type moves
    pub display_name: String,
    pub member_id: Option<i64>,
    pub member_name: Option<String>,
    pub member_phone: Option<String>,
    /// Set only for PRIVATE threads; keys the (participant, owner) pair
    pub private_participant: Option<PrivateParticipant>,
    pub table_num: Option<String>,
    pub waitress_id: Option<i64>,
    pub waitress_name: Option<String>,
    pub promoter_id: Option<i64>,
    pub reservation_id: Option<String>,
    /// Hard security-alert flag, set alongside SECURITY type/tag
    pub security_alert: bool,
    /// Roles currently entitled to view/reply
    pub recipient_roles: Vec<StaffRole>,
    pub messages: Vec<ThreadMessage>,
}

impl SmsThread {
    /// Security alerts are matched on flag, type, or tag
    pub fn is_security_alert(&self) -> bool {
        self.security_alert
            || self.thread_type == ThreadType::Security
            || self.tag == ThreadTag::Security
    }

    /// FLOOR-ness is matched on type or tag (waitress/barback rules)
    pub fn is_floor(&self) -> bool {
        self.thread_type == ThreadType::Floor || self.tag == ThreadTag::Floor
    }

    pub fn push_message(&mut self, message: ThreadMessage) {
        self.messages.push(message);
    }

    /// Expand the recipient set without dropping existing entitlements
    pub fn add_recipients(&mut self, roles: &[StaffRole]) {
        for role in roles {
            if !self.recipient_roles.contains(role) {
                self.recipient_roles.push(*role);
            }
        }
    }
}
