//! End-to-end front-of-house flows: intake → accept → seat, with the
//! routing transitions observed from each role's inbox.

use std::sync::Arc;

use floor_server::core::{Config, VenueState};
use floor_server::db::{MemoryStore, Persist};
use floor_server::reservations::{ReservationError, TableStatus};
use shared::models::{MemberCreate, StaffCreate, StaffRole, Viewer};
use shared::reservation::{ReservationIntake, ReservationStatus};
use shared::thread::{ThreadTag, ThreadType};

struct Venue {
    state: VenueState,
    member_id: i64,
    waitress_id: i64,
}

fn venue() -> Venue {
    let state = VenueState::in_memory(Config::default());
    let member = state.roster.add_member(MemberCreate {
        name: "Ava Chen".into(),
        phone: Some("555-0101".into()),
        email: None,
        notes: None,
    });
    let waitress = state.roster.add_staff(StaffCreate {
        name: "Dana".into(),
        role: StaffRole::Waitress,
        section: Some("North".into()),
    });
    Venue {
        state,
        member_id: member.id,
        waitress_id: waitress.id,
    }
}

fn intake(member_id: i64) -> ReservationIntake {
    ReservationIntake {
        member_id: Some(member_id),
        member_name: "Ava Chen".into(),
        member_phone: Some("555-0101".into()),
        date_key: "2026-08-07".into(),
        event_name: "Neon Fridays".into(),
        party_size: 4,
        occasion: "Birthday".into(),
        notes: String::new(),
        referred_by_promoter: None,
    }
}

#[test]
fn scenario_a_accept_builds_management_visible_reservation_thread() {
    let v = venue();
    let res = v.state.reservations.submit_request(intake(v.member_id)).unwrap();
    v.state.reservations.accept(&res.id, None).unwrap();

    assert_eq!(
        v.state.reservations.get(&res.id).unwrap().status,
        ReservationStatus::Confirmed
    );

    for role in [StaffRole::Owner, StaffRole::Manager, StaffRole::VipHost] {
        let viewer = Viewer::new(role, Some(1));
        let threads = v.state.threads.visible_threads(&viewer);
        assert!(
            threads.iter().any(|t| t.thread_type == ThreadType::Reservation),
            "{role} should see the reservation thread"
        );
    }

    // Not on the floor yet: the waitress sees nothing
    let waitress = Viewer::new(StaffRole::Waitress, Some(v.waitress_id));
    assert!(v.state.threads.visible_threads(&waitress).is_empty());
}

#[test]
fn scenario_b_seating_flips_thread_to_floor_and_locks_the_table() {
    let v = venue();
    let res = v.state.reservations.submit_request(intake(v.member_id)).unwrap();
    v.state.reservations.accept(&res.id, None).unwrap();
    v.state.reservations.select_table(&res.id, 3).unwrap();
    v.state
        .reservations
        .seat(&res.id, Some(v.waitress_id))
        .unwrap();

    let seated = v.state.reservations.get(&res.id).unwrap();
    assert_eq!(seated.status, ReservationStatus::Sat);
    assert_eq!(v.state.reservations.table_status(3).status, TableStatus::Sat);

    // Thread flipped to FLOOR with the replaced recipient set
    let owner = Viewer::new(StaffRole::Owner, Some(1));
    let floor_thread = v
        .state
        .threads
        .visible_threads(&owner)
        .into_iter()
        .find(|t| t.thread_type == ThreadType::Floor)
        .expect("floor thread after seating");
    assert_eq!(floor_thread.tag, ThreadTag::Floor);
    assert_eq!(
        floor_thread.recipient_roles,
        vec![StaffRole::Owner, StaffRole::Barback]
    );
    assert_eq!(floor_thread.waitress_id, Some(v.waitress_id));

    // The assigned waitress sees it; another waitress does not
    let assigned = Viewer::new(StaffRole::Waitress, Some(v.waitress_id));
    let other = Viewer::new(StaffRole::Waitress, Some(v.waitress_id + 1));
    assert_eq!(v.state.threads.visible_threads(&assigned).len(), 1);
    assert!(v.state.threads.visible_threads(&other).is_empty());

    // Barbacks see the floor thread too
    let barback = Viewer::new(StaffRole::Barback, Some(77));
    assert_eq!(v.state.threads.visible_threads(&barback).len(), 1);

    // A second party cannot take table 3
    let walk_in = v.state.reservations.add_walk_in("Sam Ortiz", None, false).unwrap();
    assert!(matches!(
        v.state.reservations.select_table(&walk_in.id, 3),
        Err(ReservationError::TableOccupied(3))
    ));
}

#[test]
fn scenario_c_decline_leaves_no_trace() {
    let v = venue();
    let res = v.state.reservations.submit_request(intake(v.member_id)).unwrap();
    v.state.reservations.decline(&res.id).unwrap();

    assert!(v.state.reservations.get(&res.id).is_none());
    assert!(v.state.calendar.entries_for("2026-08-07").is_empty());

    let owner = Viewer::new(StaffRole::Owner, Some(1));
    assert!(v.state.threads.visible_threads(&owner).is_empty());
}

#[test]
fn scenario_d_doorman_never_sees_floor_or_reservation_threads() {
    let v = venue();
    let res = v.state.reservations.submit_request(intake(v.member_id)).unwrap();
    v.state.reservations.accept(&res.id, None).unwrap();

    // Force the doorman into the recipient list — rule precedence still hides it
    let thread_id = v
        .state
        .threads
        .store()
        .find_member_thread(v.member_id, ThreadType::Reservation)
        .unwrap();
    v.state.threads.store().update(&thread_id, |t| {
        t.recipient_roles.push(StaffRole::Doorman);
    });

    let doorman = Viewer::new(StaffRole::Doorman, Some(5));
    assert!(v.state.threads.visible_threads(&doorman).is_empty());

    // Seat the party; the FLOOR thread stays invisible to the doorman too
    v.state.reservations.select_table(&res.id, 2).unwrap();
    v.state
        .reservations
        .seat(&res.id, Some(v.waitress_id))
        .unwrap();
    let floor_id = v
        .state
        .threads
        .store()
        .find_member_thread(v.member_id, ThreadType::Floor)
        .unwrap();
    v.state.threads.store().update(&floor_id, |t| {
        t.recipient_roles.push(StaffRole::Doorman);
    });
    assert!(v.state.threads.visible_threads(&doorman).is_empty());

    // A security alert is the one thing the doorman receives
    v.state.threads.send_security_alert("fight at the door").unwrap();
    let visible = v.state.threads.visible_threads(&doorman);
    assert_eq!(visible.len(), 1);
    assert!(visible[0].security_alert);
}

#[test]
fn private_threads_stay_between_owner_and_participant() {
    let v = venue();
    v.state
        .threads
        .owner_compose_to_member(v.member_id, "Welcome back — tonight's on us.")
        .unwrap();

    let owner = Viewer::new(StaffRole::Owner, Some(1));
    assert_eq!(v.state.threads.visible_threads(&owner).len(), 1);

    for role in [
        StaffRole::Manager,
        StaffRole::VipHost,
        StaffRole::Waitress,
        StaffRole::Barback,
        StaffRole::Doorman,
        StaffRole::Bartender,
    ] {
        let viewer = Viewer::new(role, Some(123));
        assert!(
            v.state.threads.visible_threads(&viewer).is_empty(),
            "{role} must not see the private thread"
        );
    }
}

#[tokio::test]
async fn seating_persists_through_the_durable_store() {
    let store = Arc::new(MemoryStore::new());
    let state = VenueState::new(Config::default(), Persist::new(store.clone()));
    let member = state.roster.add_member(MemberCreate {
        name: "Ava Chen".into(),
        phone: None,
        email: None,
        notes: None,
    });
    let waitress = state.roster.add_staff(StaffCreate {
        name: "Dana".into(),
        role: StaffRole::Waitress,
        section: None,
    });

    let res = state.reservations.submit_request(intake(member.id)).unwrap();
    state.reservations.accept(&res.id, None).unwrap();
    state.reservations.select_table(&res.id, 4).unwrap();
    state.reservations.seat(&res.id, Some(waitress.id)).unwrap();

    // fire-and-forget writes drain on the runtime
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;

    let persisted = store.reservation(&res.id).unwrap();
    assert_eq!(persisted.status, ReservationStatus::Sat);
    assert_eq!(persisted.table_assigned.as_deref(), Some("4"));
    assert_eq!(store.calendar_entries("2026-08-07").len(), 1);
    assert_eq!(store.follow_up_count(), 1);
}
