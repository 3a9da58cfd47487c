//! Booking persistence port and an in-memory reference store.
//!
//! The store, not the pre-check in [`crate::reservation`], is the authority on
//! the uniqueness invariant: at most one slot-occupying booking per
//! `(staff, date, time)`. Any implementation of [`BookingStore::insert`] must
//! check and write in one atomic step (a unique index over non-cancelled rows in
//! SQL, a single critical section here).

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use thiserror::Error;

use crate::booking::{Booking, BookingStatus, SlotKey};
use crate::schedule::SlotTime;

/// Identifier assigned to a booking by the store.
pub type BookingId = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Uniqueness violation: another slot-occupying booking holds this slot.
    #[error("Slot {time} on {date} for staff {staff_id} is already taken")]
    SlotTaken {
        staff_id: String,
        date: NaiveDate,
        time: SlotTime,
    },

    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    #[error("Booking store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence collaborator for bookings.
pub trait BookingStore: Send + Sync {
    /// Current bookings for `staff_id`, read fresh on every call.
    fn bookings_for_staff(&self, staff_id: &str) -> Result<Vec<Booking>, StoreError>;

    fn get(&self, id: BookingId) -> Result<Booking, StoreError>;

    /// Insert `booking`, failing with `StoreError::SlotTaken` if it occupies a
    /// slot already held by another booking. Check and write are atomic.
    fn insert(&self, booking: Booking) -> Result<BookingId, StoreError>;

    /// Overwrite the status of booking `id`. Lifecycle rules are enforced by
    /// [`crate::reservation::transition_booking`], not here.
    fn set_status(&self, id: BookingId, status: BookingStatus) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Rows {
    next_id: BookingId,
    rows: Vec<(BookingId, Booking)>,
}

impl Rows {
    /// The row, other than `except`, whose occupying booking holds `key`.
    fn holder_of(&self, key: &SlotKey, except: Option<BookingId>) -> Option<BookingId> {
        self.rows
            .iter()
            .find(|(id, existing)| {
                Some(*id) != except
                    && existing.status.occupies_slot()
                    && existing.slot_key() == *key
            })
            .map(|(id, _)| *id)
    }
}

/// Thread-safe in-memory [`BookingStore`].
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    inner: Mutex<Rows>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load existing bookings, rejecting any set that already breaks uniqueness.
    pub fn from_bookings<I>(bookings: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = Booking>,
    {
        let store = Self::new();
        for booking in bookings {
            store.insert(booking)?;
        }
        Ok(store)
    }

    /// Every booking in insertion order.
    pub fn snapshot(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.lock()?.rows.iter().map(|(_, b)| b.clone()).collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Rows>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("booking store lock poisoned".to_string()))
    }
}

impl BookingStore for InMemoryBookingStore {
    fn bookings_for_staff(&self, staff_id: &str) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .lock()?
            .rows
            .iter()
            .filter(|(_, b)| b.staff_id == staff_id)
            .map(|(_, b)| b.clone())
            .collect())
    }

    fn get(&self, id: BookingId) -> Result<Booking, StoreError> {
        self.lock()?
            .rows
            .iter()
            .find(|(row_id, _)| *row_id == id)
            .map(|(_, b)| b.clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn insert(&self, booking: Booking) -> Result<BookingId, StoreError> {
        let mut rows = self.lock()?;

        if booking.status.occupies_slot() && rows.holder_of(&booking.slot_key(), None).is_some() {
            tracing::warn!(
                staff_id = %booking.staff_id,
                date = %booking.date,
                time = %booking.time,
                "uniqueness violation on insert"
            );
            return Err(StoreError::SlotTaken {
                staff_id: booking.staff_id,
                date: booking.date,
                time: booking.time,
            });
        }

        rows.next_id += 1;
        let id = rows.next_id;
        rows.rows.push((id, booking));
        Ok(id)
    }

    fn set_status(&self, id: BookingId, status: BookingStatus) -> Result<(), StoreError> {
        let mut rows = self.lock()?;

        let index = rows
            .rows
            .iter()
            .position(|(row_id, _)| *row_id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut updated = rows.rows[index].1.clone();
        updated.status = status;
        if status.occupies_slot() && rows.holder_of(&updated.slot_key(), Some(id)).is_some() {
            return Err(StoreError::SlotTaken {
                staff_id: updated.staff_id,
                date: updated.date,
                time: updated.time,
            });
        }

        rows.rows[index].1 = updated;
        Ok(())
    }
}
