//! String-in, string-out wrappers around slot-engine.
//!
//! Everything the WASM exports do lives here so it can be exercised natively;
//! `lib.rs` only converts the `String` errors into `JsValue`s.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use slot_engine::availability::bookings_for_staff;
use slot_engine::locale::{weekday_name as localized_name, Locale};
use slot_engine::{
    calendar_range as engine_calendar_range, classify_day_with_window,
    get_slots_for_date_with_window, reserve_slot as engine_reserve_slot, Booking, BookingWindow,
    DayAvailability, ScheduleDocument, SlotConflict, SlotRequest, SlotTime, WeeklySchedule,
};

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CalendarEntryDto {
    date: NaiveDate,
    classification: DayAvailability,
    selectable: bool,
}

#[derive(Serialize)]
struct ReserveOutcomeDto {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict: Option<ConflictDto>,
}

#[derive(Serialize)]
struct ConflictDto {
    staff_id: String,
    date: NaiveDate,
    time: String,
    reason: slot_engine::ConflictReason,
    message: String,
}

impl From<SlotConflict> for ConflictDto {
    fn from(c: SlotConflict) -> Self {
        Self {
            message: c.to_string(),
            staff_id: c.staff_id,
            date: c.date,
            time: c.time.to_string(),
            reason: c.reason,
        }
    }
}

/// Slot choice passed from JavaScript. `staff_id` is optional but, when given,
/// must name the schedule's staff member: only their bookings are loaded.
#[derive(Deserialize)]
struct SlotRequestInput {
    staff_id: Option<String>,
    date: NaiveDate,
    time: SlotTime,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    s.parse()
        .map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn window(horizon_days: Option<u32>) -> BookingWindow {
    horizon_days.map(BookingWindow::new).unwrap_or_default()
}

/// Parse a schedule document and the bookings that belong to its staff member.
fn load(schedule_json: &str, bookings_json: &str) -> Result<(String, WeeklySchedule, Vec<Booking>), String> {
    let doc = ScheduleDocument::from_json(schedule_json)
        .map_err(|e| format!("Invalid schedule JSON: {}", e))?;
    let schedule = doc.to_schedule().map_err(|e| e.to_string())?;
    let all: Vec<Booking> = serde_json::from_str(bookings_json)
        .map_err(|e| format!("Invalid bookings JSON: {}", e))?;
    let existing = bookings_for_staff(&all, &doc.staff_id).cloned().collect();
    Ok((doc.staff_id, schedule, existing))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// JSON array of `{time, is_available}` for `date`.
pub fn slots_for_date(
    schedule_json: &str,
    date: &str,
    bookings_json: &str,
    today: &str,
    horizon_days: Option<u32>,
) -> Result<String, String> {
    let (_, schedule, existing) = load(schedule_json, bookings_json)?;
    let slots = get_slots_for_date_with_window(
        &schedule,
        parse_date(date)?,
        &existing,
        parse_date(today)?,
        window(horizon_days),
    );
    to_json(&slots)
}

/// Classification tag for `date`: `unavailable`, `fully-booked`, `limited` or `open`.
pub fn classify_day(
    schedule_json: &str,
    date: &str,
    bookings_json: &str,
    today: &str,
    horizon_days: Option<u32>,
) -> Result<String, String> {
    let (_, schedule, existing) = load(schedule_json, bookings_json)?;
    let class = classify_day_with_window(
        &schedule,
        parse_date(date)?,
        &existing,
        parse_date(today)?,
        window(horizon_days),
    );
    Ok(class.as_str().to_string())
}

/// JSON array of `{date, classification, selectable}` for `days` dates from `from`.
pub fn calendar_range(
    schedule_json: &str,
    from: &str,
    days: u32,
    bookings_json: &str,
    today: &str,
    horizon_days: Option<u32>,
) -> Result<String, String> {
    let (_, schedule, existing) = load(schedule_json, bookings_json)?;
    let entries: Vec<CalendarEntryDto> = engine_calendar_range(
        &schedule,
        parse_date(from)?,
        days,
        &existing,
        parse_date(today)?,
        window(horizon_days),
    )
    .into_iter()
    .map(|(date, classification)| CalendarEntryDto {
        date,
        classification,
        selectable: classification.is_selectable(),
    })
    .collect();
    to_json(&entries)
}

/// `{"ok": true}` when the slot can be reserved, otherwise
/// `{"ok": false, "conflict": {...}}`. Conflicts are an expected outcome, not an error.
pub fn reserve_slot(
    schedule_json: &str,
    request_json: &str,
    bookings_json: &str,
    today: &str,
    horizon_days: Option<u32>,
) -> Result<String, String> {
    let (staff_id, schedule, existing) = load(schedule_json, bookings_json)?;
    let input: SlotRequestInput = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;
    if let Some(requested) = input.staff_id.as_deref() {
        if requested != staff_id {
            return Err(format!(
                "Request is for staff '{}' but the schedule belongs to '{}'",
                requested, staff_id
            ));
        }
    }
    let request = SlotRequest {
        staff_id,
        date: input.date,
        time: input.time,
    };

    let outcome = match engine_reserve_slot(
        &request,
        &schedule,
        &existing,
        parse_date(today)?,
        window(horizon_days),
    ) {
        Ok(()) => ReserveOutcomeDto {
            ok: true,
            conflict: None,
        },
        Err(conflict) => ReserveOutcomeDto {
            ok: false,
            conflict: Some(conflict.into()),
        },
    };
    to_json(&outcome)
}

/// Display name of an ISO weekday (1 = Monday .. 7 = Sunday) in `locale_tag`.
pub fn weekday_name(iso_weekday: u32, locale_tag: &str) -> Result<String, String> {
    let locale =
        Locale::from_tag(locale_tag).ok_or_else(|| format!("Unsupported locale: {}", locale_tag))?;
    let weekday = match iso_weekday {
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        7 => Weekday::Sun,
        other => return Err(format!("ISO weekday must be 1-7, got {}", other)),
    };
    Ok(localized_name(weekday, locale).to_string())
}
