//! Sale & notification pipeline
//!
//! One idempotent contract shared by `seat()` and comp issuance:
//! calendar stamp → member notification → RESERVATION thread mirror.
//! Calling it twice with the same sale id replaces rather than duplicates.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::models::{CalendarEntry, CalendarTag, Sale, SaleStatus, SaleType};
use shared::thread::{SenderKind, SmsThread, ThreadMessage, ThreadTag, ThreadType};
use shared::util::{now_millis, today_date_key};
use std::sync::Arc;

use crate::audit::{AuditAction, AuditService};
use crate::roster::RosterStore;
use crate::threads::routing::default_recipients_for_type;
use crate::threads::store::ThreadStore;

use super::calendar::CalendarStore;
use super::log::SalesLog;

/// Comp kinds the owner can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompKind {
    Ticket,
    VipTicket,
    Table,
}

impl CompKind {
    pub fn label(&self) -> &'static str {
        match self {
            CompKind::Ticket => "GA Ticket",
            CompKind::VipTicket => "VIP Ticket",
            CompKind::Table => "Table Reservation",
        }
    }
}

/// Comp issuance record (tonight's list)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompIssued {
    pub kind: CompKind,
    pub recipient: String,
    pub note: Option<String>,
    pub issued_at: i64,
}

/// Sale & notification pipeline
pub struct SalePipeline {
    threads: Arc<ThreadStore>,
    calendar: Arc<CalendarStore>,
    sales: Arc<SalesLog>,
    roster: Arc<RosterStore>,
    audit: Arc<AuditService>,
    comps: RwLock<Vec<CompIssued>>,
}

impl SalePipeline {
    pub fn new(
        threads: Arc<ThreadStore>,
        calendar: Arc<CalendarStore>,
        sales: Arc<SalesLog>,
        roster: Arc<RosterStore>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            threads,
            calendar,
            sales,
            roster,
            audit,
            comps: RwLock::new(Vec::new()),
        }
    }

    /// Record a seating or comp sale and fan out the side effects
    ///
    /// 1. Calendar stamping (idempotent replace by sale id)
    /// 2. Member notification in the personal log
    /// 3. RESERVATION thread mirror with refreshed table/promoter metadata
    pub fn record_seating_or_comp(&self, sale: Sale) {
        tracing::info!(sale_id = %sale.id, sale_type = ?sale.sale_type, is_comp = sale.is_comp, "Recording sale");

        // 1. Calendar stamping
        self.stamp_calendar(&sale);

        // 2 + 3. Member notification and thread mirror
        if let Some(member_id) = sale.member_id {
            let msg = compose_notification(&sale);
            self.threads
                .append_member_log(member_id, ThreadMessage::new(SenderKind::Staff, &msg));
            self.mirror_into_reservation_thread(member_id, &sale, &msg);
        }

        self.sales.record(Sale {
            status: SaleStatus::Confirmed,
            ..sale
        });
    }

    fn stamp_calendar(&self, sale: &Sale) {
        let cal_tag = match sale.sale_type {
            SaleType::Table => CalendarTag::Table,
            SaleType::Ticket => CalendarTag::Ticket,
        };
        let headline = match (&sale.table_assigned, sale.sale_type) {
            (Some(table), _) => format!("Table {} — {}", table, sale.member_name),
            (None, SaleType::Table) => format!("Table TBD — {}", sale.member_name),
            (None, SaleType::Ticket) => format!("Ticket — {}", sale.member_name),
        };
        let promo_credit = sale
            .promoter_name
            .as_deref()
            .map(|p| format!(" · via {p}"))
            .unwrap_or_default();
        let sale_label = if sale.is_comp {
            "COMPED".to_string()
        } else {
            format!("${}", sale.amount)
        };
        let waitress = sale
            .waitress_name
            .as_deref()
            .map(|w| format!(" · {w}"))
            .unwrap_or_default();
        let guests = if sale.party_size > 1 { "guests" } else { "guest" };

        self.calendar.stamp(CalendarEntry {
            date_key: sale.date_key.clone(),
            name: headline,
            desc: format!(
                "{} {guests} · {}{promo_credit} · {sale_label}{waitress}",
                sale.party_size, sale.event_name
            ),
            tag: cal_tag,
            member_id: sale.member_id,
            sale_id: sale.id.clone(),
            promoter_id: sale.promoter_id,
            private: true,
        });
    }

    fn mirror_into_reservation_thread(&self, member_id: i64, sale: &Sale, msg: &str) {
        if let Some(thread_id) = self
            .threads
            .find_member_thread(member_id, ThreadType::Reservation)
        {
            self.threads.update(&thread_id, |t| {
                t.push_message(ThreadMessage::new(SenderKind::Staff, msg));
                if let Some(table) = &sale.table_assigned {
                    t.table_num = Some(table.clone());
                }
                t.promoter_id = sale.promoter_id.or(t.promoter_id);
            });
            return;
        }

        self.threads.insert(SmsThread {
            id: format!("M-{member_id}-RES"),
            thread_type: ThreadType::Reservation,
            tag: ThreadTag::Reservation,
            display_name: format!("Reservation — {}", sale.member_name),
            member_id: Some(member_id),
            member_name: Some(sale.member_name.clone()),
            member_phone: sale.member_phone.clone(),
            private_participant: None,
            table_num: sale.table_assigned.clone(),
            waitress_id: None,
            waitress_name: None,
            promoter_id: sale.promoter_id,
            reservation_id: None,
            security_alert: false,
            recipient_roles: default_recipients_for_type(ThreadType::Reservation),
            messages: vec![ThreadMessage::new(SenderKind::Staff, msg)],
        });
    }

    // ==================== Comps ====================

    /// Owner marks a member as comped without going through the reservation
    /// flow. Converges on the same sale+notify contract as `seat()`.
    pub fn issue_comp(&self, recipient: &str, kind: CompKind, note: Option<String>) {
        self.comps.write().push(CompIssued {
            kind,
            recipient: recipient.to_string(),
            note,
            issued_at: now_millis(),
        });

        let member = self.roster.member_by_name_or_phone(recipient);
        let sale_id = format!("COMP{}", now_millis() % 100_000);

        self.audit.log(
            AuditAction::CompIssued,
            "sale",
            &sale_id,
            None,
            None,
            serde_json::json!({ "recipient": recipient, "kind": kind }),
        );

        // Without a member record the comp stays a log line
        let Some(member) = member else {
            tracing::info!(recipient, "Comp issued without a member record");
            return;
        };

        self.record_seating_or_comp(Sale {
            id: sale_id,
            sale_type: match kind {
                CompKind::Table => SaleType::Table,
                _ => SaleType::Ticket,
            },
            member_id: Some(member.id),
            member_name: member.name.clone(),
            member_phone: member.phone.clone(),
            promoter_id: None,
            promoter_name: None,
            event_name: "tonight".into(),
            date_key: today_date_key(),
            table_assigned: None,
            waitress_name: None,
            party_size: 1,
            amount: 0.0,
            is_comp: true,
            status: SaleStatus::Confirmed,
            purchased_at: now_millis(),
        });
    }

    pub fn comps_issued(&self) -> Vec<CompIssued> {
        self.comps.read().clone()
    }
}

/// Compose the member-facing confirmation (table vs ticket, comp vs paid)
fn compose_notification(sale: &Sale) -> String {
    let promo_line = sale
        .promoter_name
        .as_deref()
        .map(|p| format!("\n\nYou were added via {p}'s guest list — priority entry is set."))
        .unwrap_or_default();
    let waitress_line = sale
        .waitress_name
        .as_deref()
        .map(|w| format!(" Your server tonight is {w}."))
        .unwrap_or_default();

    match sale.sale_type {
        SaleType::Table => {
            let table_line = match &sale.table_assigned {
                Some(t) => format!("\n\nYour table: {t}."),
                None => "\n\nYour table assignment is coming shortly.".to_string(),
            };
            let comp_line = if sale.is_comp {
                " (Complimentary — on the house)".to_string()
            } else {
                format!(" — ${} confirmed", sale.amount)
            };
            format!(
                "🥂 Table confirmed for {}{comp_line}.{table_line}{waitress_line}{promo_line}\n\nReply here anytime if you need anything tonight.",
                sale.event_name
            )
        }
        SaleType::Ticket => {
            let comp_word = if sale.is_comp { " complimentary" } else { "" };
            let amount = if sale.is_comp {
                String::new()
            } else {
                format!(" — ${}", sale.amount)
            };
            format!(
                "🎟️ Your{comp_word} ticket for {} is confirmed{amount}.{promo_line}\n\nSee you tonight!",
                sale.event_name
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Persist;
    use shared::models::{MemberCreate, StaffRole};

    fn setup() -> (SalePipeline, i64) {
        let roster = Arc::new(RosterStore::new(Persist::noop()));
        let member = roster.add_member(MemberCreate {
            name: "Ava Chen".into(),
            phone: Some("555-0101".into()),
            email: None,
            notes: None,
        });
        let threads = Arc::new(ThreadStore::new(Persist::noop()));
        let calendar = Arc::new(CalendarStore::new(Persist::noop()));
        let sales = Arc::new(SalesLog::new(Persist::noop()));
        let (audit, _rx) = AuditService::new(8);
        let pipeline = SalePipeline::new(threads, calendar, sales, roster, audit);
        (pipeline, member.id)
    }

    fn table_sale(id: &str, member_id: i64) -> Sale {
        Sale {
            id: id.into(),
            sale_type: SaleType::Table,
            member_id: Some(member_id),
            member_name: "Ava Chen".into(),
            member_phone: Some("555-0101".into()),
            promoter_id: None,
            promoter_name: None,
            event_name: "Neon Fridays".into(),
            date_key: "2026-08-07".into(),
            table_assigned: Some("3".into()),
            waitress_name: Some("Dana".into()),
            party_size: 4,
            amount: 250.0,
            is_comp: false,
            status: SaleStatus::Confirmed,
            purchased_at: now_millis(),
        }
    }

    #[test]
    fn recording_twice_leaves_one_calendar_entry() {
        let (pipeline, member_id) = setup();
        pipeline.record_seating_or_comp(table_sale("RES1", member_id));
        pipeline.record_seating_or_comp(table_sale("RES1", member_id));
        // 幂等：同一 sale id 只保留一条日历记录
        assert_eq!(pipeline.calendar.entries_for("2026-08-07").len(), 1);
    }

    #[test]
    fn creates_reservation_thread_when_absent() {
        let (pipeline, member_id) = setup();
        pipeline.record_seating_or_comp(table_sale("RES1", member_id));

        let thread_id = pipeline
            .threads
            .find_member_thread(member_id, ThreadType::Reservation)
            .unwrap();
        let thread = pipeline.threads.get(&thread_id).unwrap();
        assert_eq!(
            thread.recipient_roles,
            vec![StaffRole::Owner, StaffRole::Manager, StaffRole::VipHost]
        );
        assert_eq!(thread.table_num.as_deref(), Some("3"));
    }

    #[test]
    fn notification_templates_cover_comp_and_paid() {
        let mut sale = table_sale("RES1", 1);
        let paid = compose_notification(&sale);
        assert!(paid.contains("$250 confirmed"));
        assert!(paid.contains("Your table: 3."));
        assert!(paid.contains("Your server tonight is Dana."));

        sale.is_comp = true;
        let comped = compose_notification(&sale);
        assert!(comped.contains("Complimentary — on the house"));

        sale.sale_type = SaleType::Ticket;
        let ticket = compose_notification(&sale);
        assert!(ticket.contains("complimentary ticket"));
        assert!(ticket.contains("See you tonight!"));

        sale.is_comp = false;
        let ticket_paid = compose_notification(&sale);
        assert!(ticket_paid.contains("— $250"));
    }

    #[test]
    fn comp_with_member_record_fires_pipeline() {
        let (pipeline, member_id) = setup();
        pipeline.issue_comp("Ava Chen", CompKind::Table, Some("birthday".into()));

        assert_eq!(pipeline.comps_issued().len(), 1);
        let log = pipeline.threads.member_log(member_id);
        assert_eq!(log.len(), 1);
        assert!(log[0].text.contains("Complimentary"));

        // sale recorded with zero amount
        let sales = pipeline.sales.all();
        assert_eq!(sales.len(), 1);
        assert!(sales[0].is_comp);
        assert_eq!(sales[0].amount, 0.0);
    }

    #[test]
    fn comp_without_member_record_stays_a_log_line() {
        let (pipeline, _) = setup();
        pipeline.issue_comp("Somebody Unknown", CompKind::Ticket, None);
        assert_eq!(pipeline.comps_issued().len(), 1);
        assert!(pipeline.sales.all().is_empty());
    }
}
