//! Error types for slot-engine operations.

use chrono::Weekday;
use thiserror::Error;

use crate::booking::BookingStatus;
use crate::reservation::SlotConflict;
use crate::schedule::SlotTime;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid slot time: {0}")]
    InvalidSlotTime(String),

    #[error("Slots for {weekday} must be strictly increasing: {next} follows {previous}")]
    UnorderedSlots {
        weekday: Weekday,
        previous: SlotTime,
        next: SlotTime,
    },

    #[error("Unknown weekday name: {0}")]
    UnknownWeekday(String),

    #[error("Weekday configured more than once: {0}")]
    DuplicateWeekday(Weekday),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid booking transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("New bookings must be pending or confirmed, got {0}")]
    InvalidInitialStatus(BookingStatus),

    #[error(transparent)]
    Conflict(#[from] SlotConflict),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
