//! Tests for submission-time reservation checks and the booking store.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{NaiveDate, Weekday};
use slot_engine::reservation::transition_booking;
use slot_engine::store::BookingStore;
use slot_engine::{
    reserve_slot, submit_booking, Booking, BookingStatus, BookingWindow, ConflictReason,
    EngineError, InMemoryBookingStore, SlotRequest, SlotTime, StoreError, WeeklySchedule,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn time(s: &str) -> SlotTime {
    s.parse().unwrap()
}

fn today() -> NaiveDate {
    date("2026-03-16")
}

fn tuesday() -> NaiveDate {
    date("2026-03-17")
}

fn schedule() -> WeeklySchedule {
    WeeklySchedule::new()
        .with_day(
            Weekday::Tue,
            ["10:30", "12:30", "14:30", "16:30"].iter().map(|s| time(s)),
        )
        .unwrap()
}

fn request(on: NaiveDate, at: &str) -> SlotRequest {
    SlotRequest {
        staff_id: "anna".to_string(),
        date: on,
        time: time(at),
    }
}

fn booking(on: NaiveDate, at: &str, customer: &str) -> Booking {
    Booking {
        staff_id: "anna".to_string(),
        date: on,
        time: time(at),
        status: BookingStatus::Pending,
        customer_id: customer.to_string(),
        package_id: "cut-and-style".to_string(),
        total_price_cents: 6500,
    }
}

fn window() -> BookingWindow {
    BookingWindow::default()
}

// ── reserve_slot ────────────────────────────────────────────────────────────

#[test]
fn free_slot_can_be_reserved() {
    let result = reserve_slot(&request(tuesday(), "10:30"), &schedule(), &[], today(), window());
    assert!(result.is_ok());
}

#[test]
fn booked_slot_is_a_conflict() {
    let mut existing = booking(tuesday(), "10:30", "cust-1");
    existing.status = BookingStatus::Confirmed;

    let conflict = reserve_slot(
        &request(tuesday(), "10:30"),
        &schedule(),
        &[existing],
        today(),
        window(),
    )
    .unwrap_err();

    assert_eq!(conflict.reason, ConflictReason::AlreadyBooked);
    assert_eq!(conflict.time, time("10:30"));
    assert!(conflict.to_string().contains("no longer available"));
}

#[test]
fn cancelled_booking_frees_the_slot() {
    let mut existing = booking(tuesday(), "10:30", "cust-1");
    existing.status = BookingStatus::Cancelled;

    let result = reserve_slot(
        &request(tuesday(), "10:30"),
        &schedule(),
        &[existing],
        today(),
        window(),
    );
    assert!(result.is_ok());
}

#[test]
fn other_staff_bookings_do_not_conflict() {
    let mut existing = booking(tuesday(), "10:30", "cust-1");
    existing.staff_id = "ben".to_string();

    let result = reserve_slot(
        &request(tuesday(), "10:30"),
        &schedule(),
        &[existing],
        today(),
        window(),
    );
    assert!(result.is_ok());
}

#[test]
fn past_and_far_future_dates_are_outside_horizon() {
    let last_tuesday = date("2026-03-10");
    let far_tuesday = date("2026-05-19"); // today + 64 days

    for on in [last_tuesday, far_tuesday] {
        let conflict = reserve_slot(&request(on, "10:30"), &schedule(), &[], today(), window())
            .unwrap_err();
        assert_eq!(conflict.reason, ConflictReason::OutsideHorizon);
    }
}

#[test]
fn date_that_fell_out_of_the_horizon_since_selection() {
    // Picked yesterday evening, submitted after midnight.
    let conflict = reserve_slot(
        &request(date("2026-03-17"), "10:30"),
        &schedule(),
        &[],
        date("2026-03-18"),
        window(),
    )
    .unwrap_err();
    assert_eq!(conflict.reason, ConflictReason::OutsideHorizon);
}

#[test]
fn time_not_in_schedule_is_not_offered() {
    let conflict = reserve_slot(&request(tuesday(), "11:00"), &schedule(), &[], today(), window())
        .unwrap_err();
    assert_eq!(conflict.reason, ConflictReason::NotOffered);

    let wednesday = date("2026-03-18");
    let conflict = reserve_slot(&request(wednesday, "10:30"), &schedule(), &[], today(), window())
        .unwrap_err();
    assert_eq!(conflict.reason, ConflictReason::NotOffered);
}

#[test]
fn blackout_day_is_not_offered() {
    let schedule = schedule().with_blackout(tuesday());
    let conflict = reserve_slot(&request(tuesday(), "10:30"), &schedule, &[], today(), window())
        .unwrap_err();
    assert_eq!(conflict.reason, ConflictReason::NotOffered);
}

#[test]
fn pre_check_alone_admits_both_racers() {
    // Both customers read the same (empty) booking list before either writes.
    // The pre-check passes for both; only the store can break the tie.
    let stale: Vec<Booking> = Vec::new();
    let first = reserve_slot(&request(tuesday(), "12:30"), &schedule(), &stale, today(), window());
    let second = reserve_slot(&request(tuesday(), "12:30"), &schedule(), &stale, today(), window());
    assert!(first.is_ok() && second.is_ok());
}

// ── submit_booking ──────────────────────────────────────────────────────────

#[test]
fn submit_persists_and_blocks_the_slot() {
    let store = InMemoryBookingStore::new();

    let id = submit_booking(&store, &schedule(), booking(tuesday(), "14:30", "cust-1"), today(), window())
        .unwrap();
    assert_eq!(store.get(id).unwrap().customer_id, "cust-1");

    let err = submit_booking(&store, &schedule(), booking(tuesday(), "14:30", "cust-2"), today(), window())
        .unwrap_err();
    match err {
        EngineError::Conflict(conflict) => assert_eq!(conflict.reason, ConflictReason::AlreadyBooked),
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(store.snapshot().unwrap().len(), 1);
}

#[test]
fn submit_rejects_cancelled_or_completed_bookings() {
    let store = InMemoryBookingStore::new();
    let mut b = booking(tuesday(), "14:30", "cust-1");
    b.status = BookingStatus::Cancelled;

    let err = submit_booking(&store, &schedule(), b, today(), window()).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidInitialStatus(BookingStatus::Cancelled)
    ));
}

#[test]
fn submit_reports_outside_horizon() {
    let store = InMemoryBookingStore::new();
    let err = submit_booking(
        &store,
        &schedule(),
        booking(date("2026-05-19"), "10:30", "cust-1"),
        today(),
        window(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Conflict(ref c) if c.reason == ConflictReason::OutsideHorizon
    ));
}

#[test]
fn insert_time_violation_maps_to_the_same_conflict() {
    /// A store whose reads lag behind its writes, as a replica might.
    struct StaleReads(InMemoryBookingStore);

    impl BookingStore for StaleReads {
        fn bookings_for_staff(&self, _staff_id: &str) -> Result<Vec<Booking>, StoreError> {
            Ok(Vec::new())
        }
        fn get(&self, id: u64) -> Result<Booking, StoreError> {
            self.0.get(id)
        }
        fn insert(&self, booking: Booking) -> Result<u64, StoreError> {
            self.0.insert(booking)
        }
        fn set_status(&self, id: u64, status: BookingStatus) -> Result<(), StoreError> {
            self.0.set_status(id, status)
        }
    }

    let store = StaleReads(InMemoryBookingStore::new());
    submit_booking(&store, &schedule(), booking(tuesday(), "16:30", "cust-1"), today(), window())
        .unwrap();

    let err = submit_booking(&store, &schedule(), booking(tuesday(), "16:30", "cust-2"), today(), window())
        .unwrap_err();
    match err {
        EngineError::Conflict(conflict) => {
            assert_eq!(conflict.reason, ConflictReason::AlreadyBooked);
            assert_eq!(conflict.staff_id, "anna");
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[test]
fn concurrent_submissions_for_one_slot_admit_exactly_one() {
    const RACERS: usize = 8;

    for _ in 0..20 {
        let store = Arc::new(InMemoryBookingStore::new());
        let schedule = Arc::new(schedule());
        let barrier = Arc::new(Barrier::new(RACERS));

        let handles: Vec<_> = (0..RACERS)
            .map(|i| {
                let store = Arc::clone(&store);
                let schedule = Arc::clone(&schedule);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let b = booking(tuesday(), "12:30", &format!("cust-{}", i));
                    barrier.wait();
                    submit_booking(store.as_ref(), &schedule, b, today(), window())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "exactly one racer must win");
        for result in results.iter().filter(|r| r.is_err()) {
            assert!(matches!(
                result,
                Err(EngineError::Conflict(c)) if c.reason == ConflictReason::AlreadyBooked
            ));
        }
        assert_eq!(store.snapshot().unwrap().len(), 1);
    }
}

// ── Store ───────────────────────────────────────────────────────────────────

#[test]
fn store_rejects_duplicate_occupying_bookings() {
    let store = InMemoryBookingStore::new();
    store.insert(booking(tuesday(), "10:30", "cust-1")).unwrap();

    let err = store.insert(booking(tuesday(), "10:30", "cust-2")).unwrap_err();
    assert_eq!(
        err,
        StoreError::SlotTaken {
            staff_id: "anna".to_string(),
            date: tuesday(),
            time: time("10:30"),
        }
    );
}

#[test]
fn store_holds_each_staff_date_time_separately() {
    let store = InMemoryBookingStore::new();
    store.insert(booking(tuesday(), "10:30", "cust-1")).unwrap();

    let mut ben = booking(tuesday(), "10:30", "cust-2");
    ben.staff_id = "ben".to_string();
    assert!(store.insert(ben).is_ok());
    assert!(store.insert(booking(tuesday(), "12:30", "cust-3")).is_ok());
    assert!(store.insert(booking(date("2026-03-24"), "10:30", "cust-4")).is_ok());
}

#[test]
fn store_allows_rebooking_after_cancellation() {
    let store = InMemoryBookingStore::new();
    let id = store.insert(booking(tuesday(), "10:30", "cust-1")).unwrap();
    store.set_status(id, BookingStatus::Cancelled).unwrap();

    assert!(store.insert(booking(tuesday(), "10:30", "cust-2")).is_ok());

    // The cancelled row cannot be revived while the slot is held again.
    let err = store.set_status(id, BookingStatus::Pending).unwrap_err();
    assert!(matches!(err, StoreError::SlotTaken { .. }));
}

#[test]
fn from_bookings_rejects_inconsistent_data() {
    let result = InMemoryBookingStore::from_bookings(vec![
        booking(tuesday(), "10:30", "cust-1"),
        booking(tuesday(), "10:30", "cust-2"),
    ]);
    assert!(result.is_err());
}

#[test]
fn store_reads_are_per_staff() {
    let mut ben = booking(tuesday(), "10:30", "cust-2");
    ben.staff_id = "ben".to_string();
    let store = InMemoryBookingStore::from_bookings(vec![booking(tuesday(), "10:30", "cust-1"), ben])
        .unwrap();

    assert_eq!(store.bookings_for_staff("anna").unwrap().len(), 1);
    assert_eq!(store.bookings_for_staff("ben").unwrap().len(), 1);
    assert!(store.bookings_for_staff("cleo").unwrap().is_empty());
}

#[test]
fn missing_booking_is_not_found() {
    let store = InMemoryBookingStore::new();
    assert_eq!(store.get(42).unwrap_err(), StoreError::NotFound(42));
    assert_eq!(
        store.set_status(42, BookingStatus::Cancelled).unwrap_err(),
        StoreError::NotFound(42)
    );
}

// ── transition_booking ──────────────────────────────────────────────────────

#[test]
fn transition_booking_applies_lifecycle_rules() {
    let store = InMemoryBookingStore::new();
    let id = store.insert(booking(tuesday(), "10:30", "cust-1")).unwrap();

    let confirmed = transition_booking(&store, id, BookingStatus::Confirmed, today()).unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(store.get(id).unwrap().status, BookingStatus::Confirmed);

    let err = transition_booking(&store, id, BookingStatus::Completed, today()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));

    transition_booking(&store, id, BookingStatus::Completed, date("2026-03-18")).unwrap();
    assert_eq!(store.get(id).unwrap().status, BookingStatus::Completed);
}

#[test]
fn transition_booking_on_missing_id_is_a_store_error() {
    let store = InMemoryBookingStore::new();
    let err = transition_booking(&store, 7, BookingStatus::Confirmed, today()).unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::NotFound(7))));
}
