use chrono::Utc;
use seat_reservation::booking::BookingError;
use seat_reservation::lifecycle::{ReservationConfig, ReservationSystem};
use seat_reservation::model::{BookingStatus, HoldOutcome, SeatError, SeatLabel, Show, ShowEvent, ShowId};
use seat_reservation::store::{BookingStore, InMemoryBookingStore, InMemoryShowCatalog};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const SHOW: ShowId = ShowId(1);

fn system() -> (ReservationSystem, Arc<InMemoryBookingStore>) {
    let catalog = InMemoryShowCatalog::with_shows([
        Show::new(SHOW, "Metropolis", Utc::now(), 12.5),
        Show::new(ShowId(2), "Stalker", Utc::now(), 9.0),
    ]);
    let store = Arc::new(InMemoryBookingStore::new());
    let system = ReservationSystem::new(ReservationConfig::default(), Arc::new(catalog), store.clone());
    (system, store)
}

fn seat(raw: &str) -> SeatLabel {
    raw.parse().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_bookings_of_one_seat_have_one_winner() {
    let (system, store) = system();

    let mut tasks = Vec::new();
    for user in 0..16 {
        let bookings = system.bookings.clone();
        tasks.push(tokio::spawn(async move {
            bookings.create_booking(SHOW, &format!("user-{user}"), &["A1"]).await
        }));
    }

    let mut winners = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert_eq!(
                e,
                BookingError::Conflict {
                    conflicts: vec![seat("A1")]
                }
            ),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(store.bookings_for_show(SHOW).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_bookings_never_share_a_seat() {
    let (system, store) = system();
    let selections: Vec<Vec<String>> = (0..10u8)
        .map(|i| {
            // Each selection overlaps its neighbours by one column.
            let start = i % 8 + 1;
            (start..start + 3).map(|c| format!("B{c}")).collect()
        })
        .collect();

    let mut tasks = Vec::new();
    for (i, selection) in selections.into_iter().enumerate() {
        let bookings = system.bookings.clone();
        tasks.push(tokio::spawn(async move {
            bookings.create_booking(SHOW, &format!("user-{i}"), selection.as_slice()).await
        }));
    }
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) | Err(BookingError::Conflict { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let mut seen = HashSet::new();
    for booking in store.bookings_for_show(SHOW).await.unwrap() {
        for seat in booking.seats {
            assert!(seen.insert(seat), "{seat} booked twice");
        }
    }
    assert!(!seen.is_empty());
}

#[tokio::test]
async fn test_duplicate_labels_never_reach_the_store() {
    let (system, store) = system();

    let err = system.bookings.create_booking(SHOW, "alice", &["A1", "a1"]).await.unwrap_err();
    assert_eq!(err, BookingError::InvalidSelection(SeatError::DuplicateSeat(vec!["A1".into()])));

    let err = system
        .bookings
        .create_booking(SHOW, "alice", &["A1", "K4", "B0"])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BookingError::InvalidSelection(SeatError::InvalidFormat(vec!["K4".into(), "B0".into()]))
    );
    assert!(store.bookings_for_show(SHOW).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_ignores_holds_and_drops_them() {
    let (system, _) = system();
    system.holds.request_hold(SHOW, "alice", &["C5"], None).await.unwrap();
    let mut events = system.subscribe(SHOW, "conn-1");

    // Holds are advisory: the store decides.
    let booking = system.bookings.create_booking(SHOW, "bob", &["C5"]).await.unwrap();
    assert!(system.holds.held_seats(SHOW).await.unwrap().is_empty());

    assert_eq!(
        events.recv().await,
        Some(ShowEvent::BookingConfirmed {
            show_id: SHOW,
            booking_id: booking.id,
            seats: vec![seat("C5")],
        })
    );
    assert!(events.try_recv().is_none(), "dropping holds on booked seats is silent");

    let alice = system.holds.request_hold(SHOW, "alice", &["C5"], None).await.unwrap();
    assert_eq!(alice.outcome_of(seat("C5")), Some(HoldOutcome::AlreadyBooked));
}

#[tokio::test]
async fn test_cancelling_frees_the_seats() {
    let (system, _) = system();
    let booking = system.bookings.create_booking(SHOW, "alice", &["D1", "D2"]).await.unwrap();
    let mut events = system.subscribe(SHOW, "conn-1");

    let cancelled = system.bookings.cancel_booking(booking.id, "alice").await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(matches!(
        events.recv().await,
        Some(ShowEvent::BookingCancelled { booking_id, .. }) if booking_id == booking.id
    ));

    let rebooked = system.bookings.create_booking(SHOW, "bob", &["D2"]).await.unwrap();
    assert_eq!(rebooked.total_price, 12.5);

    let availability = system.seat_availability(SHOW).await.unwrap();
    assert_eq!(availability.booked, vec![seat("D2")]);
}

#[tokio::test]
async fn test_commit_fault_leaves_no_partial_booking() {
    let (system, store) = system();
    store.fail_next_commits(1);

    let err = system.bookings.create_booking(SHOW, "alice", &["E1", "E2"]).await.unwrap_err();
    assert_eq!(err, BookingError::Unavailable);
    assert!(store.bookings_for_show(SHOW).await.unwrap().is_empty());

    // The retry sees no trace of the failed attempt.
    let booking = system.bookings.create_booking(SHOW, "alice", &["E1", "E2"]).await.unwrap();
    assert_eq!(store.bookings_for_show(SHOW).await.unwrap(), vec![booking]);
}

#[tokio::test]
async fn test_seat_availability_reports_booked_and_held() {
    let (system, _) = system();
    system.bookings.create_booking(SHOW, "alice", &["A1", "A2"]).await.unwrap();
    system.holds.request_hold(SHOW, "bob", &["A3"], None).await.unwrap();

    let availability = system.seat_availability(SHOW).await.unwrap();
    assert_eq!(availability.booked, vec![seat("A1"), seat("A2")]);
    assert_eq!(availability.held, vec![seat("A3")]);
    assert_eq!(availability.total_booked_seats, 2);
    assert_eq!(availability.available_seats, 98);
    let row_a = &availability.seat_map[0];
    assert!(!row_a.seats[0].available);
    assert!(row_a.seats[2].available && row_a.seats[2].held);

    assert!(system.seat_availability(ShowId(42)).await.is_err());
}

#[tokio::test]
async fn test_history_spans_shows_newest_first() {
    let (system, _) = system();
    let first = system.bookings.create_booking(SHOW, "alice", &["F1"]).await.unwrap();
    let second = system.bookings.create_booking(ShowId(2), "alice", &["F1", "F2"]).await.unwrap();
    system.bookings.create_booking(SHOW, "bob", &["F2"]).await.unwrap();

    let history = system.bookings.booking_history("alice").await.unwrap();
    let ids: Vec<_> = history.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(history[0].total_price, 18.0);
}

#[tokio::test]
async fn test_cancel_and_history_ignore_other_shows_transactions() {
    let (system, store) = system();
    let booking = system.bookings.create_booking(SHOW, "alice", &["G1"]).await.unwrap();

    let mut open = Vec::new();
    for show in 2..=20 {
        open.push(store.begin(ShowId(show)).await.unwrap());
    }

    let timeout = Duration::from_millis(500);
    let cancelled = tokio::time::timeout(timeout, system.bookings.cancel_booking(booking.id, "alice"))
        .await
        .expect("cancel waited for another show")
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let history = tokio::time::timeout(timeout, system.bookings.booking_history("alice"))
        .await
        .expect("history waited for another show")
        .unwrap();
    assert_eq!(history, vec![cancelled]);
    drop(open);
}

#[tokio::test]
async fn test_granted_hold_loses_to_a_committed_booking() {
    let (system, store) = system();
    let alice = system.holds.request_hold(SHOW, "alice", &["A1", "A2"], None).await.unwrap();
    assert_eq!(alice.granted(), vec![seat("A1"), seat("A2")]);

    system.bookings.create_booking(SHOW, "bob", &["A2"]).await.unwrap();

    let err = system.bookings.create_booking(SHOW, "alice", &["A1", "A2"]).await.unwrap_err();
    assert_eq!(
        err,
        BookingError::Conflict {
            conflicts: vec![seat("A2")]
        }
    );
    let rows = store.bookings_for_show(SHOW).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, "bob");
}
