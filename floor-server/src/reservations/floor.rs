//! Floor allocation view
//!
//! Derived, stateless projection over the reservation queue: never
//! persisted, recomputed on demand after every lifecycle mutation. The
//! queue is the source of truth; this only answers "what is table N's
//! status right now".

use serde::{Deserialize, Serialize};
use shared::reservation::{Reservation, ReservationStatus};

/// Derived table status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    /// A confirmed reservation holds this table (advisory pre-assignment)
    Reserved,
    /// A seated party occupies this table
    Sat,
}

/// One tile of the floor plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub number: u8,
    pub status: TableStatus,
    /// Occupying member, when reserved or sat
    pub member_name: Option<String>,
}

/// Status of a single table: sat beats reserved beats available
pub fn table_status(reservations: &[Reservation], table_num: u8) -> TableInfo {
    let label = table_num.to_string();
    if let Some(sat) = reservations
        .iter()
        .find(|r| r.status == ReservationStatus::Sat && r.table_assigned.as_deref() == Some(&label))
    {
        return TableInfo {
            number: table_num,
            status: TableStatus::Sat,
            member_name: Some(sat.member_name.clone()),
        };
    }
    if let Some(confirmed) = reservations.iter().find(|r| {
        r.status == ReservationStatus::Confirmed && r.table_assigned.as_deref() == Some(&label)
    }) {
        return TableInfo {
            number: table_num,
            status: TableStatus::Reserved,
            member_name: Some(confirmed.member_name.clone()),
        };
    }
    TableInfo {
        number: table_num,
        status: TableStatus::Available,
        member_name: None,
    }
}

/// The whole floor (tables 1..=table_count)
pub type FloorPlan = Vec<TableInfo>;

pub fn floor_plan(reservations: &[Reservation], table_count: u8) -> FloorPlan {
    (1..=table_count)
        .map(|n| table_status(reservations, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::now_millis;

    fn reservation(id: &str, status: ReservationStatus, table: Option<&str>) -> Reservation {
        Reservation {
            id: id.into(),
            member_id: Some(1),
            member_name: "Ava Chen".into(),
            member_phone: None,
            date_key: "2026-08-07".into(),
            event_name: "Neon Fridays".into(),
            party_size: 4,
            occasion: "Birthday".into(),
            notes: String::new(),
            status,
            table_assigned: table.map(String::from),
            waitress_assigned: None,
            referred_by_promoter: None,
            requested_at: now_millis(),
        }
    }

    #[test]
    fn sat_beats_reserved() {
        let queue = vec![
            reservation("R1", ReservationStatus::Confirmed, Some("3")),
            reservation("R2", ReservationStatus::Sat, Some("3")),
        ];
        let info = table_status(&queue, 3);
        assert_eq!(info.status, TableStatus::Sat);
    }

    #[test]
    fn confirmed_shows_reserved() {
        let queue = vec![reservation("R1", ReservationStatus::Confirmed, Some("5"))];
        assert_eq!(table_status(&queue, 5).status, TableStatus::Reserved);
        assert_eq!(table_status(&queue, 6).status, TableStatus::Available);
    }

    #[test]
    fn pending_never_holds_a_table() {
        let queue = vec![reservation("R1", ReservationStatus::Pending, Some("2"))];
        assert_eq!(table_status(&queue, 2).status, TableStatus::Available);
    }

    #[test]
    fn floor_plan_covers_all_tables() {
        let queue = vec![reservation("R1", ReservationStatus::Sat, Some("10"))];
        let plan = floor_plan(&queue, 10);
        assert_eq!(plan.len(), 10);
        assert_eq!(plan[9].status, TableStatus::Sat);
        assert_eq!(plan[9].member_name.as_deref(), Some("Ava Chen"));
        assert!(plan[..9].iter().all(|t| t.status == TableStatus::Available));
    }
}
