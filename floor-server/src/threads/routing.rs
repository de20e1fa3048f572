//! Routing tables and the visibility predicate
//!
//! Two independent recipient-derivation tables exist: the type table drives
//! actual delivery, the tag table is the compatibility fallback for threads
//! that predate explicit typing. Keep them in sync when the taxonomy moves.

use shared::models::{StaffRole, Viewer};
use shared::thread::{ParticipantKind, SmsThread, ThreadTag, ThreadType};

use super::capability::RoleCapabilities;

/// Default recipient roles for a thread type
///
/// FLOOR deliberately omits the waitress role: the assigned server is
/// reached via `waitress_id` on the thread, not role membership.
pub fn default_recipients_for_type(thread_type: ThreadType) -> Vec<StaffRole> {
    use StaffRole::*;
    match thread_type {
        ThreadType::Security => vec![Doorman, Manager, VipHost, Owner],
        ThreadType::Floor => vec![Barback, Owner],
        ThreadType::Reservation => vec![Owner, Manager, VipHost],
        ThreadType::Management => vec![Manager, VipHost, Owner],
        // + the specific participant via private_participant
        ThreadType::Private => vec![Owner],
        ThreadType::General => vec![Owner],
    }
}

/// Default recipient roles for a display tag (legacy fallback)
pub fn default_recipients_for_tag(tag: ThreadTag) -> Vec<StaffRole> {
    use StaffRole::*;
    match tag {
        ThreadTag::Security => vec![Doorman, Manager, VipHost, Owner],
        ThreadTag::Floor => vec![Barback, Owner], // waitress via waitress_id
        ThreadTag::Reservation => vec![Owner, Manager, VipHost],
        ThreadTag::Vip => vec![VipHost, Owner],
        ThreadTag::Management => vec![Manager, VipHost, Owner],
        ThreadTag::General => vec![Owner],
    }
}

/// Canonical display name for a thread of a given type
pub fn default_thread_name_for_type(
    thread_type: ThreadType,
    member_or_staff_name: Option<&str>,
    table_num: Option<&str>,
) -> String {
    let name = member_or_staff_name.unwrap_or("Guest");
    match thread_type {
        ThreadType::Floor => match table_num {
            Some(t) => format!("{name} — Table {t}"),
            None => name.to_string(),
        },
        ThreadType::Private => format!("Message with {name}"),
        ThreadType::Reservation => format!("Reservation — {name}"),
        ThreadType::Security => "Security Alert".to_string(),
        ThreadType::Management => "Management".to_string(),
        ThreadType::General => "General".to_string(),
    }
}

/// Member compose destination — one of the buttons members see
///
/// `recipient_roles` = which staff roles receive the thread.
#[derive(Debug, Clone)]
pub struct MemberDestination {
    pub id: &'static str,
    pub label: &'static str,
    pub tag: ThreadTag,
    pub thread_type: ThreadType,
    pub recipient_roles: &'static [StaffRole],
    pub placeholder: &'static str,
}

/// The four member compose destinations
pub fn member_destinations() -> &'static [MemberDestination] {
    use StaffRole::*;
    const DESTINATIONS: &[MemberDestination] = &[
        MemberDestination {
            id: "owner",
            label: "Message Owner",
            tag: ThreadTag::General,
            // creates a private 1:1 thread with owner
            thread_type: ThreadType::Private,
            recipient_roles: &[Owner],
            placeholder: "Message the owner directly...",
        },
        MemberDestination {
            id: "management",
            label: "Message Management",
            tag: ThreadTag::Management,
            thread_type: ThreadType::Management,
            recipient_roles: &[Owner, Manager, VipHost],
            placeholder: "Message management team...",
        },
        MemberDestination {
            id: "waitstaff",
            label: "Message Wait Staff",
            tag: ThreadTag::Floor,
            thread_type: ThreadType::Floor,
            recipient_roles: &[Waitress, Barback, Owner],
            placeholder: "Message your server or bar staff...",
        },
        MemberDestination {
            id: "security",
            label: "Message Security",
            tag: ThreadTag::Security,
            thread_type: ThreadType::Security,
            recipient_roles: &[Doorman, Manager, VipHost, Owner],
            placeholder: "Alert security team...",
        },
    ];
    DESTINATIONS
}

/// Visibility predicate — the precedence order here is load-bearing
///
/// 1. PRIVATE threads: owner, or the matching staff participant
/// 2. Security alerts: `recipient_roles` membership only
/// 3. Doorman sees nothing but security alerts
/// 4. Everything else requires `recipient_roles` membership
/// 5. Waitress: FLOOR threads additionally require her `waitress_id`
/// 6. Barback: FLOOR threads only
/// 7. Bartender: only PRIVATE threads opened with them (handled by rule 1;
///    every non-private thread is filtered here)
pub fn thread_visible(thread: &SmsThread, viewer: &Viewer) -> bool {
    let role = viewer.role;

    // 1. PRIVATE: only owner + the specific participant
    if thread.thread_type == ThreadType::Private {
        if role == StaffRole::Owner {
            return true;
        }
        return match thread.private_participant {
            Some(p) => p.kind == ParticipantKind::Staff && Some(p.id) == viewer.staff_id,
            None => false,
        };
    }

    // 2. Security alerts route strictly by recipient list
    if thread.is_security_alert() {
        return thread.recipient_roles.contains(&role);
    }

    // 3. Doorman only sees security
    if role == StaffRole::Doorman {
        return false;
    }

    // 4. Recipient list gate
    if !thread.recipient_roles.contains(&role) {
        return false;
    }

    // 5. Waitress: only FLOOR threads assigned to her
    if role == StaffRole::Waitress {
        if thread.is_floor() {
            return thread.waitress_id.is_some() && thread.waitress_id == viewer.staff_id;
        }
        return false;
    }

    // 6. Barback: only FLOOR threads
    if role == StaffRole::Barback {
        return thread.is_floor();
    }

    // 7. Bartender: nothing outside their own private threads
    if role == StaffRole::Bartender {
        return false;
    }

    true
}

/// Convenience: capability lookup for a viewer
pub fn capabilities(viewer: &Viewer) -> RoleCapabilities {
    RoleCapabilities::for_role(viewer.role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::thread::PrivateParticipant;

    fn base_thread(thread_type: ThreadType, tag: ThreadTag) -> SmsThread {
        SmsThread {
            id: "T1".into(),
            thread_type,
            tag,
            display_name: "Test".into(),
            member_id: Some(1),
            member_name: Some("Ava Chen".into()),
            member_phone: None,
            private_participant: None,
            table_num: None,
            waitress_id: None,
            waitress_name: None,
            promoter_id: None,
            reservation_id: None,
            security_alert: false,
            recipient_roles: default_recipients_for_type(thread_type),
            messages: vec![],
        }
    }

    #[test]
    fn private_thread_visible_to_owner_and_participant_only() {
        let mut thread = base_thread(ThreadType::Private, ThreadTag::General);
        thread.private_participant = Some(PrivateParticipant {
            kind: ParticipantKind::Staff,
            id: 42,
        });

        let owner = Viewer::new(StaffRole::Owner, Some(1));
        let participant = Viewer::new(StaffRole::Waitress, Some(42));
        let other = Viewer::new(StaffRole::Manager, Some(7));

        assert!(thread_visible(&thread, &owner));
        assert!(thread_visible(&thread, &participant));
        assert!(!thread_visible(&thread, &other));
    }

    #[test]
    fn doorman_sees_only_security_even_when_listed() {
        // Explicitly listed on a RESERVATION thread — rule 3 still wins
        let mut reservation = base_thread(ThreadType::Reservation, ThreadTag::Reservation);
        reservation.recipient_roles.push(StaffRole::Doorman);
        let doorman = Viewer::new(StaffRole::Doorman, Some(9));
        assert!(!thread_visible(&reservation, &doorman));

        let security = base_thread(ThreadType::Security, ThreadTag::Security);
        assert!(thread_visible(&security, &doorman));
    }

    #[test]
    fn waitress_needs_her_id_on_floor_threads() {
        let mut floor = base_thread(ThreadType::Floor, ThreadTag::Floor);
        floor.recipient_roles.push(StaffRole::Waitress);
        floor.waitress_id = Some(5);

        assert!(thread_visible(&floor, &Viewer::new(StaffRole::Waitress, Some(5))));
        assert!(!thread_visible(&floor, &Viewer::new(StaffRole::Waitress, Some(6))));

        // No id on the thread: nobody's floor thread
        floor.waitress_id = None;
        assert!(!thread_visible(&floor, &Viewer::new(StaffRole::Waitress, Some(5))));
    }

    #[test]
    fn barback_sees_floor_only() {
        let floor = base_thread(ThreadType::Floor, ThreadTag::Floor);
        let general = base_thread(ThreadType::General, ThreadTag::General);
        let barback = Viewer::new(StaffRole::Barback, Some(3));
        assert!(thread_visible(&floor, &barback));
        assert!(!thread_visible(&general, &barback));
    }

    #[test]
    fn security_alert_by_tag_routes_by_recipients() {
        // GENERAL type retagged SECURITY still routes as an alert
        let mut thread = base_thread(ThreadType::General, ThreadTag::Security);
        thread.recipient_roles = default_recipients_for_tag(ThreadTag::Security);
        assert!(thread_visible(&thread, &Viewer::new(StaffRole::Doorman, Some(2))));
        assert!(!thread_visible(&thread, &Viewer::new(StaffRole::Barback, Some(2))));
    }

    #[test]
    fn type_table_reference_rows() {
        assert_eq!(
            default_recipients_for_type(ThreadType::Floor),
            vec![StaffRole::Barback, StaffRole::Owner]
        );
        assert_eq!(
            default_recipients_for_type(ThreadType::Reservation),
            vec![StaffRole::Owner, StaffRole::Manager, StaffRole::VipHost]
        );
        assert_eq!(default_recipients_for_type(ThreadType::General), vec![StaffRole::Owner]);
        assert_eq!(
            default_recipients_for_tag(ThreadTag::Vip),
            vec![StaffRole::VipHost, StaffRole::Owner]
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(
            default_thread_name_for_type(ThreadType::Floor, Some("Ava Chen"), Some("3")),
            "Ava Chen — Table 3"
        );
        assert_eq!(
            default_thread_name_for_type(ThreadType::Reservation, Some("Ava Chen"), None),
            "Reservation — Ava Chen"
        );
        assert_eq!(
            default_thread_name_for_type(ThreadType::Private, None, None),
            "Message with Guest"
        );
        assert_eq!(
            default_thread_name_for_type(ThreadType::Security, Some("x"), None),
            "Security Alert"
        );
    }
}
