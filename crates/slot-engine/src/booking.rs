//! Booking records and their status lifecycle.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::schedule::SlotTime;

/// Lifecycle status of a booking.
///
/// ```text
/// pending ──► confirmed ──► completed
///    │            │
///    └──► cancelled ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Whether a booking in this status holds its slot.
    ///
    /// `Completed` still counts so that historical dates report the slot as taken.
    pub fn occupies_slot(self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(staff, date, time)` triple that at most one slot-occupying booking may hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub staff_id: String,
    pub date: NaiveDate,
    pub time: SlotTime,
}

/// A reservation of one slot by one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub staff_id: String,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub status: BookingStatus,
    pub customer_id: String,
    pub package_id: String,
    /// Total price in minor currency units (cents).
    pub total_price_cents: u64,
}

impl Booking {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            staff_id: self.staff_id.clone(),
            date: self.date,
            time: self.time,
        }
    }

    pub fn occupies(&self, date: NaiveDate, time: SlotTime) -> bool {
        self.status.occupies_slot() && self.date == date && self.time == time
    }

    /// Move the booking to `next`.
    ///
    /// `confirmed -> completed` additionally requires the appointment date to be
    /// strictly before `today`.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTransition` for any move the lifecycle forbids.
    pub fn transition(&mut self, next: BookingStatus, today: NaiveDate) -> Result<()> {
        let premature = next == BookingStatus::Completed && self.date >= today;
        if !self.status.can_transition_to(next) || premature {
            return Err(EngineError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        tracing::debug!(
            staff_id = %self.staff_id,
            date = %self.date,
            time = %self.time,
            from = %self.status,
            to = %next,
            "booking status changed"
        );
        self.status = next;
        Ok(())
    }
}

/// Parse a JSON array of bookings.
pub fn bookings_from_json(json: &str) -> Result<Vec<Booking>> {
    Ok(serde_json::from_str(json)?)
}
