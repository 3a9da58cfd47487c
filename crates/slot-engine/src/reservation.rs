//! Submission-time reservation checks.
//!
//! Between a customer seeing a slot as free and submitting the booking, another
//! customer may take it. [`reserve_slot`] re-checks a single slot against a fresh
//! read of the bookings, and [`submit_booking`] wires that check to the store's
//! atomic insert. The pre-check on its own cannot close the race: two callers
//! can both pass it before either inserts. Only the store's uniqueness guarantee
//! can, and an insert-time violation is reported as the same [`SlotConflict`].

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::availability::BookingWindow;
use crate::booking::{Booking, BookingStatus};
use crate::error::{EngineError, Result};
use crate::schedule::{SlotTime, WeeklySchedule};
use crate::store::{BookingId, BookingStore, StoreError};

/// Why a requested slot cannot be reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictReason {
    /// A slot-occupying booking already holds it.
    AlreadyBooked,
    /// The date is in the past or beyond the booking horizon.
    OutsideHorizon,
    /// The time is not a candidate slot on that date.
    NotOffered,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictReason::AlreadyBooked => "already booked",
            ConflictReason::OutsideHorizon => "outside booking horizon",
            ConflictReason::NotOffered => "not offered",
        })
    }
}

/// The requested slot is no longer available. Callers should re-fetch the slot
/// list and ask the customer to pick another time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Slot {time} on {date} for staff {staff_id} is no longer available ({reason})")]
pub struct SlotConflict {
    pub staff_id: String,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub reason: ConflictReason,
}

/// A customer's choice of slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub staff_id: String,
    pub date: NaiveDate,
    pub time: SlotTime,
}

impl SlotRequest {
    fn conflict(&self, reason: ConflictReason) -> SlotConflict {
        SlotConflict {
            staff_id: self.staff_id.clone(),
            date: self.date,
            time: self.time,
            reason,
        }
    }
}

impl From<&Booking> for SlotRequest {
    fn from(b: &Booking) -> Self {
        Self {
            staff_id: b.staff_id.clone(),
            date: b.date,
            time: b.time,
        }
    }
}

/// Check that the requested slot can still be reserved.
///
/// `existing` must be read from the store immediately before this call; reusing
/// the list that rendered the slot picker defeats the check. Even with a fresh
/// read this is only a pre-check: persist through a store whose insert enforces
/// uniqueness atomically (see [`submit_booking`]).
///
/// # Errors
/// Returns a [`SlotConflict`] whose reason is, in order of precedence,
/// `OutsideHorizon`, `NotOffered` or `AlreadyBooked`.
pub fn reserve_slot(
    request: &SlotRequest,
    schedule: &WeeklySchedule,
    existing: &[Booking],
    today: NaiveDate,
    window: BookingWindow,
) -> std::result::Result<(), SlotConflict> {
    if !window.contains(today, request.date) {
        return Err(request.conflict(ConflictReason::OutsideHorizon));
    }

    if !schedule.slots_on(request.date).contains(&request.time) {
        return Err(request.conflict(ConflictReason::NotOffered));
    }

    let taken = existing
        .iter()
        .any(|b| b.staff_id == request.staff_id && b.occupies(request.date, request.time));
    if taken {
        return Err(request.conflict(ConflictReason::AlreadyBooked));
    }

    Ok(())
}

/// Reserve and persist `booking` in one step.
///
/// Re-fetches the staff member's bookings from `store`, runs [`reserve_slot`],
/// then inserts. A uniqueness violation at insert time maps to the same
/// `AlreadyBooked` conflict as the pre-check, so callers handle one outcome.
///
/// # Errors
/// - `EngineError::InvalidInitialStatus` unless `booking` is pending or confirmed.
/// - `EngineError::Conflict` if the slot is unavailable.
/// - `EngineError::Store` for any other store failure.
pub fn submit_booking<S>(
    store: &S,
    schedule: &WeeklySchedule,
    booking: Booking,
    today: NaiveDate,
    window: BookingWindow,
) -> Result<BookingId>
where
    S: BookingStore + ?Sized,
{
    if !matches!(booking.status, BookingStatus::Pending | BookingStatus::Confirmed) {
        return Err(EngineError::InvalidInitialStatus(booking.status));
    }

    let request = SlotRequest::from(&booking);
    let existing = store.bookings_for_staff(&request.staff_id)?;

    if let Err(conflict) = reserve_slot(&request, schedule, &existing, today, window) {
        tracing::info!(
            staff_id = %conflict.staff_id,
            date = %conflict.date,
            time = %conflict.time,
            reason = %conflict.reason,
            "reservation rejected by pre-check"
        );
        return Err(conflict.into());
    }

    match store.insert(booking) {
        Ok(id) => {
            tracing::info!(
                booking_id = id,
                staff_id = %request.staff_id,
                date = %request.date,
                time = %request.time,
                "booking stored"
            );
            Ok(id)
        }
        Err(StoreError::SlotTaken { .. }) => {
            tracing::info!(
                staff_id = %request.staff_id,
                date = %request.date,
                time = %request.time,
                "reservation lost the race at insert"
            );
            Err(request.conflict(ConflictReason::AlreadyBooked).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Apply a lifecycle transition to a stored booking.
///
/// # Errors
/// - `EngineError::InvalidTransition` if the lifecycle forbids the move.
/// - `EngineError::Store` if the booking is missing or the write fails.
pub fn transition_booking<S>(
    store: &S,
    id: BookingId,
    next: BookingStatus,
    today: NaiveDate,
) -> Result<Booking>
where
    S: BookingStore + ?Sized,
{
    let mut booking = store.get(id)?;
    booking.transition(next, today)?;
    store.set_status(id, booking.status)?;
    Ok(booking)
}
