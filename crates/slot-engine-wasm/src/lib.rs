//! WASM bindings for slot-engine.
//!
//! Exposes slot lists, day classification, calendar ranges and the
//! submission-time reservation check to the browser booking funnel via
//! `wasm-bindgen`. Schedules, bookings and results cross the boundary as JSON
//! strings; dates are `YYYY-MM-DD` and "today" is always passed in.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

pub mod json_api;

use wasm_bindgen::prelude::*;

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Slots for `date` as a JSON array of `{time, is_available}`.
///
/// # Arguments
/// - `schedule_json` -- Schedule document (`staff_id`, `locale`, `days`, `blackouts`)
/// - `date` -- Date to inspect
/// - `bookings_json` -- JSON array of bookings (any staff; filtered by the schedule's)
/// - `today` -- Reference date for the horizon
/// - `horizon_days` -- Optional horizon override (defaults to 60)
#[wasm_bindgen(js_name = "getSlotsForDate")]
pub fn get_slots_for_date(
    schedule_json: &str,
    date: &str,
    bookings_json: &str,
    today: &str,
    horizon_days: Option<u32>,
) -> Result<String, JsValue> {
    json_api::slots_for_date(schedule_json, date, bookings_json, today, horizon_days).map_err(js_err)
}

/// Calendar tag for `date`: `unavailable`, `fully-booked`, `limited` or `open`.
#[wasm_bindgen(js_name = "classifyDay")]
pub fn classify_day(
    schedule_json: &str,
    date: &str,
    bookings_json: &str,
    today: &str,
    horizon_days: Option<u32>,
) -> Result<String, JsValue> {
    json_api::classify_day(schedule_json, date, bookings_json, today, horizon_days).map_err(js_err)
}

/// Classifications for `days` consecutive dates as a JSON array of
/// `{date, classification, selectable}`.
#[wasm_bindgen(js_name = "calendarRange")]
pub fn calendar_range(
    schedule_json: &str,
    from: &str,
    days: u32,
    bookings_json: &str,
    today: &str,
    horizon_days: Option<u32>,
) -> Result<String, JsValue> {
    json_api::calendar_range(schedule_json, from, days, bookings_json, today, horizon_days)
        .map_err(js_err)
}

/// Re-check one slot right before submitting. `request_json` is
/// `{date, time, staff_id?}`; `bookings_json` must be freshly fetched.
#[wasm_bindgen(js_name = "reserveSlot")]
pub fn reserve_slot(
    schedule_json: &str,
    request_json: &str,
    bookings_json: &str,
    today: &str,
    horizon_days: Option<u32>,
) -> Result<String, JsValue> {
    json_api::reserve_slot(schedule_json, request_json, bookings_json, today, horizon_days)
        .map_err(js_err)
}

#[wasm_bindgen(js_name = "weekdayName")]
pub fn weekday_name(iso_weekday: u32, locale: &str) -> Result<String, JsValue> {
    json_api::weekday_name(iso_weekday, locale).map_err(js_err)
}
