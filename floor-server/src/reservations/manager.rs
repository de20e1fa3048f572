//! ReservationsManager - lifecycle state machine
//!
//! # Command Flow
//!
//! ```text
//! submit_request / add_manual / add_walk_in
//!     └─ pending (member intake) or confirmed (staff entry)
//! accept   : pending → confirmed, member notified, RESERVATION thread
//! decline  : pending → removed (calendar entries removed too)
//! select_table : stages a candidate table (transient, never reserves)
//! seat     : confirmed → sat — the commit re-validates the table under
//!            the store's write lock, fires the sale pipeline, converts
//!            the thread to FLOOR and enqueues the 9 AM follow-up
//! ```
//!
//! Every successful mutation broadcasts a [`ReservationEvent`].

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use shared::models::{SaleStatus, SaleType, StaffRole};
use shared::reservation::{
    ManualReservationEntry, Reservation, ReservationEvent, ReservationEventKind, ReservationIntake,
    ReservationStatus,
};
use shared::thread::{SenderKind, SmsThread, ThreadMessage, ThreadTag, ThreadType};
use shared::util::{now_millis, snowflake_id, today_date_key};
use thiserror::Error;
use tokio::sync::broadcast;
use validator::Validate;

use crate::audit::{AuditAction, AuditService};
use crate::db::Persist;
use crate::followup::{next_fire_at, FollowUpQueue};
use crate::roster::RosterStore;
use crate::sales::{CalendarStore, PriceList, SalePipeline, SalesLog};
use crate::threads::routing::default_recipients_for_type;
use crate::threads::store::ThreadStore;

use super::floor::{self, FloorPlan, TableInfo};

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    NotFound(String),

    #[error("Reservation {0} is not pending")]
    NotPending(String),

    #[error("Reservation {0} is not confirmed")]
    NotConfirmed(String),

    #[error("Select a table from the floor plan first")]
    TableNotSelected,

    #[error("Assign a waitress before marking as sat")]
    WaitressNotAssigned,

    #[error("Table {0} is already sat — pick another table")]
    TableOccupied(u8),

    #[error("Table {0} is outside the floor plan")]
    TableOutOfRange(u8),

    #[error("Staff member not found: {0}")]
    StaffNotFound(i64),

    #[error("{0}")]
    Invalid(String),
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        let code = match &err {
            ReservationError::NotFound(_) => ErrorCode::ReservationNotFound,
            ReservationError::NotPending(_) => ErrorCode::ReservationNotPending,
            ReservationError::NotConfirmed(_) => ErrorCode::ReservationNotConfirmed,
            ReservationError::TableNotSelected => ErrorCode::TableNotSelected,
            ReservationError::WaitressNotAssigned => ErrorCode::WaitressNotAssigned,
            ReservationError::TableOccupied(_) => ErrorCode::TableOccupied,
            ReservationError::TableOutOfRange(_) => ErrorCode::TableOutOfRange,
            ReservationError::StaffNotFound(_) => ErrorCode::StaffNotFound,
            ReservationError::Invalid(_) => ErrorCode::ValidationFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

impl From<validator::ValidationErrors> for ReservationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Surface the first field message; hosts show it as-is
        let msg = errors
            .field_errors()
            .into_values()
            .flatten()
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Validation failed".to_string());
        ReservationError::Invalid(msg)
    }
}

pub type ReservationResult<T> = Result<T, ReservationError>;

#[derive(Default)]
struct ReservationsInner {
    by_id: HashMap<String, Reservation>,
    order: Vec<String>,
}

/// ReservationsManager for lifecycle commands
pub struct ReservationsManager {
    reservations: RwLock<ReservationsInner>,
    /// Transient candidate tables, keyed by reservation id (staging only)
    staged: DashMap<String, u8>,
    table_count: u8,
    follow_up_hour: u32,
    threads: Arc<ThreadStore>,
    roster: Arc<RosterStore>,
    pipeline: Arc<SalePipeline>,
    calendar: Arc<CalendarStore>,
    sales: Arc<SalesLog>,
    followups: Arc<FollowUpQueue>,
    prices: Arc<PriceList>,
    audit: Arc<AuditService>,
    persist: Persist,
    event_tx: broadcast::Sender<ReservationEvent>,
}

impl ReservationsManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        table_count: u8,
        follow_up_hour: u32,
        threads: Arc<ThreadStore>,
        roster: Arc<RosterStore>,
        pipeline: Arc<SalePipeline>,
        calendar: Arc<CalendarStore>,
        sales: Arc<SalesLog>,
        followups: Arc<FollowUpQueue>,
        prices: Arc<PriceList>,
        audit: Arc<AuditService>,
        persist: Persist,
        event_capacity: usize,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(event_capacity);
        Self {
            reservations: RwLock::new(ReservationsInner::default()),
            staged: DashMap::new(),
            table_count,
            follow_up_hour,
            threads,
            roster,
            pipeline,
            calendar,
            sales,
            followups,
            prices,
            audit,
            persist,
            event_tx,
        }
    }

    /// Subscribe to reservation event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<ReservationEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, reservation_id: &str, kind: ReservationEventKind) {
        let _ = self
            .event_tx
            .send(ReservationEvent::new(reservation_id, kind));
    }

    fn insert(&self, reservation: Reservation) {
        self.persist.save_reservation(&reservation);
        let mut inner = self.reservations.write();
        inner.order.push(reservation.id.clone());
        inner.by_id.insert(reservation.id.clone(), reservation);
    }

    // ==================== Queries ====================

    pub fn get(&self, id: &str) -> Option<Reservation> {
        self.reservations.read().by_id.get(id).cloned()
    }

    pub fn all(&self) -> Vec<Reservation> {
        let inner = self.reservations.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect()
    }

    pub fn with_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.all()
            .into_iter()
            .filter(|r| r.status == status)
            .collect()
    }

    /// Currently staged candidate table for a reservation
    pub fn staged_table(&self, reservation_id: &str) -> Option<u8> {
        self.staged.get(reservation_id).map(|e| *e.value())
    }

    /// Derived table status (recomputed on demand, never persisted)
    pub fn table_status(&self, table_num: u8) -> TableInfo {
        floor::table_status(&self.all(), table_num)
    }

    /// Derived status for the whole floor
    pub fn floor_plan(&self) -> FloorPlan {
        floor::floor_plan(&self.all(), self.table_count)
    }

    // ==================== Intake ====================

    /// Member-facing reservation request → pending queue + pending sale
    pub fn submit_request(&self, intake: ReservationIntake) -> ReservationResult<Reservation> {
        intake.validate()?;

        let promoter = intake
            .referred_by_promoter
            .and_then(|id| self.roster.promoter(id))
            .filter(|p| p.active);

        let reservation = Reservation {
            id: format!("RES{}", snowflake_id()),
            member_id: intake.member_id,
            member_name: intake.member_name.clone(),
            member_phone: intake.member_phone.clone(),
            date_key: intake.date_key.clone(),
            event_name: intake.event_name.clone(),
            party_size: intake.party_size,
            occasion: if intake.occasion.is_empty() {
                "General visit".to_string()
            } else {
                intake.occasion.clone()
            },
            notes: intake.notes.clone(),
            status: ReservationStatus::Pending,
            table_assigned: None,
            waitress_assigned: None,
            referred_by_promoter: promoter.as_ref().map(|p| p.id),
            requested_at: now_millis(),
        };

        // Pending table sale priced by party band, attributed to the promoter
        self.sales.record(shared::models::Sale {
            id: reservation.id.clone(),
            sale_type: SaleType::Table,
            member_id: reservation.member_id,
            member_name: reservation.member_name.clone(),
            member_phone: reservation.member_phone.clone(),
            promoter_id: promoter.as_ref().map(|p| p.id),
            promoter_name: promoter.as_ref().map(|p| p.name.clone()),
            event_name: reservation.event_name.clone(),
            date_key: reservation.date_key.clone(),
            table_assigned: None,
            waitress_name: None,
            party_size: reservation.party_size,
            amount: self.prices.table_price_for_party(reservation.party_size),
            is_comp: false,
            status: SaleStatus::Pending,
            purchased_at: now_millis(),
        });

        if let Some(p) = &promoter {
            self.roster.add_promoter_guest(p.id, &reservation.member_name);
        }

        tracing::info!(reservation_id = %reservation.id, party_size = reservation.party_size, "Reservation requested");
        self.insert(reservation.clone());
        self.emit(&reservation.id, ReservationEventKind::Submitted);
        Ok(reservation)
    }

    /// Staff manual entry — lands directly confirmed
    pub fn add_manual(&self, entry: ManualReservationEntry) -> ReservationResult<Reservation> {
        entry.validate()?;

        let existing = self.roster.match_member(&entry.name, entry.phone.as_deref());
        let reservation = Reservation {
            id: format!("RES{}", snowflake_id()),
            member_id: existing.as_ref().map(|m| m.id),
            member_name: entry.name.clone(),
            member_phone: entry
                .phone
                .clone()
                .or_else(|| existing.as_ref().and_then(|m| m.phone.clone())),
            date_key: today_date_key(),
            event_name: "Tonight".to_string(),
            party_size: entry.party_size,
            occasion: if entry.occasion.is_empty() {
                "General visit".to_string()
            } else {
                entry.occasion.clone()
            },
            notes: entry.notes.clone(),
            status: ReservationStatus::Confirmed,
            table_assigned: None,
            waitress_assigned: None,
            referred_by_promoter: None,
            requested_at: now_millis(),
        };

        tracing::info!(reservation_id = %reservation.id, "Manual reservation added");
        self.insert(reservation.clone());
        self.emit(
            &reservation.id,
            ReservationEventKind::Created { walk_in: false },
        );
        Ok(reservation)
    }

    /// Walk-in shortcut: party of one, occasion "Walk-in", directly
    /// confirmed so it enters the same select/seat path. Optionally creates
    /// the member record on the fly.
    pub fn add_walk_in(
        &self,
        name: &str,
        phone: Option<&str>,
        create_member: bool,
    ) -> ReservationResult<Reservation> {
        if name.trim().is_empty() {
            return Err(ReservationError::Invalid("guest name is required".into()));
        }
        let member = match self.roster.match_member(name, phone) {
            Some(m) => Some(m),
            None if create_member => Some(self.roster.add_member(shared::models::MemberCreate {
                name: name.to_string(),
                phone: phone.map(String::from),
                email: None,
                notes: None,
            })),
            None => None,
        };

        let reservation = Reservation {
            id: format!("RES{}", snowflake_id()),
            member_id: member.as_ref().map(|m| m.id),
            member_name: name.to_string(),
            member_phone: phone
                .map(String::from)
                .or_else(|| member.as_ref().and_then(|m| m.phone.clone())),
            date_key: today_date_key(),
            event_name: "Tonight".to_string(),
            party_size: 1,
            occasion: "Walk-in".to_string(),
            notes: String::new(),
            status: ReservationStatus::Confirmed,
            table_assigned: None,
            waitress_assigned: None,
            referred_by_promoter: None,
            requested_at: now_millis(),
        };

        tracing::info!(reservation_id = %reservation.id, "Walk-in added");
        self.insert(reservation.clone());
        self.emit(
            &reservation.id,
            ReservationEventKind::Created { walk_in: true },
        );
        Ok(reservation)
    }

    // ==================== Lifecycle ====================

    /// Accept a pending request: pending → confirmed
    ///
    /// The table hint is advisory only — stored unvalidated, not checked
    /// against other reservations at this stage.
    pub fn accept(
        &self,
        reservation_id: &str,
        table_hint: Option<&str>,
    ) -> ReservationResult<Reservation> {
        let hint = table_hint.map(str::trim).filter(|t| !t.is_empty());

        let updated = {
            let mut inner = self.reservations.write();
            let res = inner
                .by_id
                .get_mut(reservation_id)
                .ok_or_else(|| ReservationError::NotFound(reservation_id.to_string()))?;
            if res.status != ReservationStatus::Pending {
                return Err(ReservationError::NotPending(reservation_id.to_string()));
            }
            res.table_assigned = hint.map(String::from);
            res.status = ReservationStatus::Confirmed;
            res.clone()
        };
        self.persist.save_reservation(&updated);

        // Member notification + RESERVATION thread with the management set
        if let Some(member_id) = updated.member_id {
            let guests = if updated.party_size > 1 { "guests" } else { "guest" };
            let table_note = match &updated.table_assigned {
                Some(t) => format!(" Your table: {t}."),
                None => " Your table assignment will follow shortly.".to_string(),
            };
            let confirm_msg = format!(
                "🥂 Your reservation for {} is confirmed — {} {guests}!{table_note} We're looking forward to having you. See you soon!",
                updated.event_name, updated.party_size
            );
            self.threads.append_member_log(
                member_id,
                ThreadMessage::new(SenderKind::Staff, &confirm_msg),
            );

            let thread_id = self.upsert_reservation_thread(member_id, &updated, &confirm_msg);

            // Internal team note
            let occasion_part = if updated.occasion != "General visit" {
                format!("Occasion: {}. ", updated.occasion)
            } else {
                String::new()
            };
            let table_part = updated
                .table_assigned
                .as_deref()
                .map(|t| format!(", Table {t}"))
                .unwrap_or_default();
            let notes_part = if updated.notes.is_empty() {
                String::new()
            } else {
                format!(" Notes: \"{}\"", updated.notes)
            };
            let internal = format!(
                "📋 TEAM: Reservation accepted for {} — {} pax{table_part}. {occasion_part}VIP Host & Manager notified.{notes_part}",
                updated.member_name, updated.party_size
            );
            self.threads.update(&thread_id, |t| {
                t.push_message(ThreadMessage::new(SenderKind::Internal, internal));
            });
        }

        self.audit.log(
            AuditAction::ReservationAccepted,
            "reservation",
            reservation_id,
            None,
            None,
            serde_json::json!({ "table_hint": updated.table_assigned }),
        );
        tracing::info!(reservation_id, "Reservation accepted");
        self.emit(
            reservation_id,
            ReservationEventKind::Accepted {
                table_hint: updated.table_assigned.clone(),
            },
        );
        Ok(updated)
    }

    /// Decline a pending request: the row is removed entirely, along with
    /// any calendar entries carrying its sale id
    pub fn decline(&self, reservation_id: &str) -> ReservationResult<()> {
        let removed = {
            let mut inner = self.reservations.write();
            let res = inner
                .by_id
                .get(reservation_id)
                .ok_or_else(|| ReservationError::NotFound(reservation_id.to_string()))?;
            if res.status != ReservationStatus::Pending {
                return Err(ReservationError::NotPending(reservation_id.to_string()));
            }
            inner.order.retain(|id| id != reservation_id);
            inner.by_id.remove(reservation_id).expect("checked above")
        };

        self.staged.remove(reservation_id);
        self.calendar.remove(&removed.date_key, &removed.id);
        self.persist.remove_reservation(reservation_id);

        self.audit.log(
            AuditAction::ReservationDeclined,
            "reservation",
            reservation_id,
            None,
            None,
            serde_json::Value::Null,
        );
        tracing::info!(reservation_id, "Reservation declined and removed");
        self.emit(reservation_id, ReservationEventKind::Declined);
        Ok(())
    }

    /// Stage a candidate table for a reservation
    ///
    /// Staging never reserves: multiple reservations may stage different
    /// tables concurrently, and the commit re-validates. Sat tables are
    /// rejected up front.
    pub fn select_table(&self, reservation_id: &str, table_num: u8) -> ReservationResult<()> {
        if table_num < 1 || table_num > self.table_count {
            return Err(ReservationError::TableOutOfRange(table_num));
        }
        if self.get(reservation_id).is_none() {
            return Err(ReservationError::NotFound(reservation_id.to_string()));
        }
        if self.table_status(table_num).status == floor::TableStatus::Sat {
            return Err(ReservationError::TableOccupied(table_num));
        }
        self.staged.insert(reservation_id.to_string(), table_num);
        self.emit(
            reservation_id,
            ReservationEventKind::TableSelected { table_num },
        );
        Ok(())
    }

    /// Mark as sat: confirmed → sat
    ///
    /// Requires a staged table and a waitress. The double-booking re-check
    /// and the commit run under the same write lock, so two sessions racing
    /// for one table cannot both pass.
    pub fn seat(
        &self,
        reservation_id: &str,
        waitress_id: Option<i64>,
    ) -> ReservationResult<Reservation> {
        if self.get(reservation_id).is_none() {
            return Err(ReservationError::NotFound(reservation_id.to_string()));
        }
        let table_num = self
            .staged
            .get(reservation_id)
            .map(|e| *e.value())
            .ok_or(ReservationError::TableNotSelected)?;
        let waitress_id = waitress_id.ok_or(ReservationError::WaitressNotAssigned)?;
        let waitress = self
            .roster
            .staff(waitress_id)
            .ok_or(ReservationError::StaffNotFound(waitress_id))?;

        let updated = {
            let mut inner = self.reservations.write();

            let res = inner
                .by_id
                .get(reservation_id)
                .ok_or_else(|| ReservationError::NotFound(reservation_id.to_string()))?;
            if res.status != ReservationStatus::Confirmed {
                return Err(ReservationError::NotConfirmed(reservation_id.to_string()));
            }

            // Commit-time conflict check, inside the lock: no other
            // reservation may already hold this table as sat
            let label = table_num.to_string();
            let conflict = inner.by_id.values().any(|r| {
                r.id != reservation_id
                    && r.status == ReservationStatus::Sat
                    && r.table_assigned.as_deref() == Some(&label)
            });
            if conflict {
                return Err(ReservationError::TableOccupied(table_num));
            }

            let res = inner.by_id.get_mut(reservation_id).expect("checked above");
            res.waitress_assigned = Some(waitress_id);
            res.table_assigned = Some(label);
            res.status = ReservationStatus::Sat;
            res.clone()
        };

        self.staged.remove(reservation_id);
        self.persist.save_reservation(&updated);

        // Sale pipeline — amount/comp carried from a prior pending sale for
        // this member + type, else zero
        let prior = updated
            .member_id
            .and_then(|m| self.sales.find_for_member(m, SaleType::Table));
        let promoter_id = prior
            .as_ref()
            .and_then(|s| s.promoter_id)
            .or(updated.referred_by_promoter);
        let promoter_name = prior.as_ref().and_then(|s| s.promoter_name.clone());
        self.pipeline.record_seating_or_comp(shared::models::Sale {
            id: updated.id.clone(),
            sale_type: SaleType::Table,
            member_id: updated.member_id,
            member_name: updated.member_name.clone(),
            member_phone: updated.member_phone.clone(),
            promoter_id,
            promoter_name,
            event_name: if updated.event_name.is_empty() {
                "tonight".to_string()
            } else {
                updated.event_name.clone()
            },
            date_key: updated.date_key.clone(),
            table_assigned: updated.table_assigned.clone(),
            waitress_name: Some(waitress.name.clone()),
            party_size: updated.party_size,
            amount: prior.as_ref().map(|s| s.amount).unwrap_or(0.0),
            is_comp: prior.as_ref().map(|s| s.is_comp).unwrap_or(false),
            status: SaleStatus::Confirmed,
            purchased_at: now_millis(),
        });

        // Thread transition: RESERVATION → FLOOR. Recipients are replaced
        // entirely — owner + barbacks; the waitress is reached via
        // waitress_id, not role membership.
        if let Some(member_id) = updated.member_id {
            if let Some(thread_id) = self
                .threads
                .find_member_thread(member_id, ThreadType::Reservation)
            {
                let table = updated.table_assigned.clone().expect("set at commit");
                self.threads.update(&thread_id, |t| {
                    t.thread_type = ThreadType::Floor;
                    t.tag = ThreadTag::Floor;
                    t.display_name = format!("{} — Table {}", updated.member_name, table);
                    t.table_num = Some(table.clone());
                    t.waitress_id = Some(waitress.id);
                    t.waitress_name = Some(waitress.name.clone());
                    t.recipient_roles = vec![StaffRole::Owner, StaffRole::Barback];
                    t.push_message(ThreadMessage::new(
                        SenderKind::Internal,
                        format!(
                            "🪑 Table {} sat. {} is assigned as server. Barbacks notified.",
                            table, waitress.name
                        ),
                    ));
                });
            }

            // Next-morning follow-up
            let fire_at = next_fire_at(chrono::Local::now(), self.follow_up_hour);
            self.followups
                .schedule(member_id, &updated.member_name, &updated.event_name, fire_at);
        }

        self.audit.log(
            AuditAction::TableSat,
            "reservation",
            reservation_id,
            Some(waitress.id),
            Some(waitress.name.clone()),
            serde_json::json!({ "table": table_num }),
        );
        tracing::info!(reservation_id, table = table_num, waitress = %waitress.name, "Table sat");
        self.emit(
            reservation_id,
            ReservationEventKind::Seated {
                table_num,
                waitress_id,
            },
        );
        Ok(updated)
    }

    /// Find-or-create the member's RESERVATION thread and append `msg`,
    /// resetting the management recipient set
    fn upsert_reservation_thread(
        &self,
        member_id: i64,
        reservation: &Reservation,
        msg: &str,
    ) -> String {
        if let Some(thread_id) = self
            .threads
            .find_member_thread(member_id, ThreadType::Reservation)
        {
            self.threads.update(&thread_id, |t| {
                t.table_num = reservation.table_assigned.clone().or(t.table_num.take());
                t.display_name = format!("Reservation — {}", reservation.member_name);
                t.push_message(ThreadMessage::new(SenderKind::Staff, msg));
                t.recipient_roles = default_recipients_for_type(ThreadType::Reservation);
            });
            return thread_id;
        }

        let thread = SmsThread {
            id: format!("M-{member_id}-RES"),
            thread_type: ThreadType::Reservation,
            tag: ThreadTag::Reservation,
            display_name: format!("Reservation — {}", reservation.member_name),
            member_id: Some(member_id),
            member_name: Some(reservation.member_name.clone()),
            member_phone: reservation.member_phone.clone(),
            private_participant: None,
            table_num: reservation.table_assigned.clone(),
            waitress_id: None,
            waitress_name: None,
            promoter_id: None,
            reservation_id: Some(reservation.id.clone()),
            security_alert: false,
            recipient_roles: default_recipients_for_type(ThreadType::Reservation),
            messages: vec![ThreadMessage::new(SenderKind::Staff, msg)],
        };
        let id = thread.id.clone();
        self.threads.insert(thread);
        id
    }
}
