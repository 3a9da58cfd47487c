//! # slot-engine
//!
//! Appointment availability for staff with recurring weekly schedules.
//!
//! Given a staff member's weekly template of candidate slot times and the
//! bookings that already exist, the engine decides which slots on a date are
//! bookable, how a date should be decorated on a calendar (open, limited,
//! fully booked, unavailable), and whether a slot can still be reserved at the
//! moment a customer submits.
//!
//! All availability functions are pure. "Today" is an explicit argument; read
//! it once with [`clock::today_in`].
//!
//! ```rust
//! use chrono::{NaiveDate, Weekday};
//! use slot_engine::{classify_day, get_slots_for_date, DayAvailability, SlotTime, WeeklySchedule};
//!
//! let slots: Vec<SlotTime> = ["10:30", "12:30", "14:30", "16:30"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! let schedule = WeeklySchedule::new().with_day(Weekday::Tue, slots).unwrap();
//!
//! let today = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! let tuesday = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();
//!
//! assert_eq!(get_slots_for_date(&schedule, tuesday, &[], today).len(), 4);
//! assert_eq!(classify_day(&schedule, tuesday, &[], today), DayAvailability::Open);
//! ```
//!
//! ## Modules
//!
//! - [`schedule`] — `SlotTime`, `WeeklySchedule`, and the serialized `ScheduleDocument`
//! - [`locale`] — Localized weekday names at the UI boundary
//! - [`booking`] — Booking records and the status lifecycle
//! - [`availability`] — Slot lists, day classification, calendar ranges
//! - [`reservation`] — Submission-time slot checks and the submit flow
//! - [`store`] — Booking persistence port and in-memory store
//! - [`clock`] — Timezone-aware "today"
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod clock;
pub mod error;
pub mod locale;
pub mod reservation;
pub mod schedule;
pub mod store;

pub use availability::{
    calendar_range, classify_day, classify_day_with_window, get_slots_for_date,
    get_slots_for_date_with_window, BookingWindow, DayAvailability, SlotAvailability,
};
pub use booking::{Booking, BookingStatus};
pub use error::EngineError;
pub use locale::Locale;
pub use reservation::{reserve_slot, submit_booking, ConflictReason, SlotConflict, SlotRequest};
pub use schedule::{ScheduleDocument, SlotTime, WeeklySchedule};
pub use store::{BookingStore, InMemoryBookingStore, StoreError};
