//! Slot- and day-level availability for one staff member.
//!
//! Every function here is pure: the weekly template, the existing bookings and
//! the reference date `today` are all supplied by the caller, so identical inputs
//! always produce identical output. Callers read the clock once (see
//! [`crate::clock::today_in`]) and pass the result down.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::schedule::{SlotTime, WeeklySchedule};

/// Default number of days past `today` that can still be booked.
pub const DEFAULT_HORIZON_DAYS: u32 = 60;

/// The forward window within which appointments may be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    pub horizon_days: u32,
}

impl Default for BookingWindow {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl BookingWindow {
    pub fn new(horizon_days: u32) -> Self {
        Self { horizon_days }
    }

    /// Last bookable date, or `None` if it would overflow the calendar.
    pub fn last_day(&self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_add_days(Days::new(u64::from(self.horizon_days)))
    }

    /// `today <= date <= today + horizon_days`.
    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        date >= today && self.last_day(today).is_none_or(|last| date <= last)
    }
}

/// Availability of one candidate slot on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub time: SlotTime,
    pub is_available: bool,
}

/// Calendar classification of a `(staff, date)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayAvailability {
    /// Not working, blacked out, in the past, or beyond the horizon.
    Unavailable,
    /// Every candidate slot is taken.
    FullyBooked,
    /// Fewer than half of the candidate slots remain.
    Limited,
    Open,
}

impl DayAvailability {
    /// Whether the calendar should let the customer pick this date.
    pub fn is_selectable(self) -> bool {
        matches!(self, DayAvailability::Limited | DayAvailability::Open)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayAvailability::Unavailable => "unavailable",
            DayAvailability::FullyBooked => "fully-booked",
            DayAvailability::Limited => "limited",
            DayAvailability::Open => "open",
        }
    }
}

/// Compute the slot list for `date` using the default 60-day window.
///
/// See [`get_slots_for_date_with_window`].
pub fn get_slots_for_date(
    schedule: &WeeklySchedule,
    date: NaiveDate,
    existing: &[Booking],
    today: NaiveDate,
) -> Vec<SlotAvailability> {
    get_slots_for_date_with_window(schedule, date, existing, today, BookingWindow::default())
}

/// Compute the slot list for `date`.
///
/// Returns one entry per candidate slot of the date's weekday, in ascending time
/// order. A weekday without slots, or a blackout date, yields an empty list.
///
/// A slot is available unless a slot-occupying booking holds the same date and
/// time, or `date` lies outside `window` relative to `today`.
///
/// # Arguments
///
/// * `schedule` — The staff member's weekly template.
/// * `date` — The calendar date being inspected.
/// * `existing` — Bookings for this staff member. Cancelled ones are ignored.
/// * `today` — Reference date for the horizon check.
/// * `window` — Booking horizon.
pub fn get_slots_for_date_with_window(
    schedule: &WeeklySchedule,
    date: NaiveDate,
    existing: &[Booking],
    today: NaiveDate,
    window: BookingWindow,
) -> Vec<SlotAvailability> {
    let in_window = window.contains(today, date);

    schedule
        .slots_on(date)
        .iter()
        .map(|&time| SlotAvailability {
            time,
            is_available: in_window && !existing.iter().any(|b| b.occupies(date, time)),
        })
        .collect()
}

/// Classify `date` using the default 60-day window.
///
/// See [`classify_day_with_window`].
pub fn classify_day(
    schedule: &WeeklySchedule,
    date: NaiveDate,
    existing: &[Booking],
    today: NaiveDate,
) -> DayAvailability {
    classify_day_with_window(schedule, date, existing, today, BookingWindow::default())
}

/// Classify `date` for calendar rendering.
///
/// - `Unavailable` when there are no candidate slots or `date` is outside the window.
/// - `FullyBooked` when no slot is available.
/// - `Limited` when `available < total / 2` (floor division, so 2 of 4 is still open).
/// - `Open` otherwise.
pub fn classify_day_with_window(
    schedule: &WeeklySchedule,
    date: NaiveDate,
    existing: &[Booking],
    today: NaiveDate,
    window: BookingWindow,
) -> DayAvailability {
    let slots = get_slots_for_date_with_window(schedule, date, existing, today, window);
    if slots.is_empty() || !window.contains(today, date) {
        return DayAvailability::Unavailable;
    }

    let total = slots.len();
    let available = slots.iter().filter(|s| s.is_available).count();

    if available == 0 {
        DayAvailability::FullyBooked
    } else if available < total / 2 {
        DayAvailability::Limited
    } else {
        DayAvailability::Open
    }
}

/// Classify `days` consecutive dates starting at `from`, in date order.
///
/// Stops early if the range runs past the end of the supported calendar.
pub fn calendar_range(
    schedule: &WeeklySchedule,
    from: NaiveDate,
    days: u32,
    existing: &[Booking],
    today: NaiveDate,
    window: BookingWindow,
) -> Vec<(NaiveDate, DayAvailability)> {
    from.iter_days()
        .take(days as usize)
        .map(|date| {
            (
                date,
                classify_day_with_window(schedule, date, existing, today, window),
            )
        })
        .collect()
}

/// Bookings held by `staff_id`, for callers that fetched every staff member at once.
pub fn bookings_for_staff<'a>(
    bookings: &'a [Booking],
    staff_id: &'a str,
) -> impl Iterator<Item = &'a Booking> + 'a {
    bookings.iter().filter(move |b| b.staff_id == staff_id)
}
