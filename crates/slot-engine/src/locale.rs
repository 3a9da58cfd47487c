//! Weekday names at the UI boundary.
//!
//! Schedules are authored with localized day names ("Dienstag", "Tuesday").
//! Internally the engine only ever keys on [`chrono::Weekday`]; this module is
//! the single translation point between the two, so a locale mismatch fails
//! loudly when a schedule is loaded instead of silently producing empty days.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// A locale in which weekday names may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
}

const ENGLISH: [(&str, &str); 7] = [
    ("Monday", "Mon"),
    ("Tuesday", "Tue"),
    ("Wednesday", "Wed"),
    ("Thursday", "Thu"),
    ("Friday", "Fri"),
    ("Saturday", "Sat"),
    ("Sunday", "Sun"),
];

const GERMAN: [(&str, &str); 7] = [
    ("Montag", "Mo"),
    ("Dienstag", "Di"),
    ("Mittwoch", "Mi"),
    ("Donnerstag", "Do"),
    ("Freitag", "Fr"),
    ("Samstag", "Sa"),
    ("Sonntag", "So"),
];

impl Locale {
    fn names(self) -> &'static [(&'static str, &'static str); 7] {
        match self {
            Locale::English => &ENGLISH,
            Locale::German => &GERMAN,
        }
    }

    /// Parse a locale tag such as `"de"` or `"de-DE"`.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        let primary = tag.split(['-', '_']).next().unwrap_or("");
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Locale::English),
            "de" => Some(Locale::German),
            _ => None,
        }
    }
}

/// Parse a weekday name written in `locale`.
///
/// Accepts the full name and the conventional short form, case-insensitively
/// and ignoring surrounding whitespace. Returns `None` for anything else.
pub fn parse_weekday(name: &str, locale: Locale) -> Option<Weekday> {
    let name = name.trim();
    locale
        .names()
        .iter()
        .position(|(full, short)| full.eq_ignore_ascii_case(name) || short.eq_ignore_ascii_case(name))
        .map(weekday_from_index)
}

/// The full display name of `weekday` in `locale`.
pub fn weekday_name(weekday: Weekday, locale: Locale) -> &'static str {
    locale.names()[weekday.num_days_from_monday() as usize].0
}

fn weekday_from_index(index: usize) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
