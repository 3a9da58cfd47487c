//! Weekly schedule templates: the candidate slot times a staff member offers
//! on each day of the week, plus blackout dates that override the template.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, Result};
use crate::locale::{self, Locale};

/// A bookable time of day, at minute precision.
///
/// Parsed from and rendered as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Build a slot time from an hour and minute. Returns `None` when out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<SlotTime> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(SlotTime)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for SlotTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<SlotTime> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(SlotTime)
            .map_err(|_| EngineError::InvalidSlotTime(s.to_string()))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The recurring day-of-week template of candidate slot times for one staff member.
///
/// Keyed by [`Weekday`], never by a localized name. A weekday with no slots means
/// the staff member does not work that day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<SlotTime>; 7],
    blackouts: BTreeSet<NaiveDate>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate slots for `weekday`, replacing any previous entry.
    ///
    /// # Errors
    /// Returns `EngineError::UnorderedSlots` unless the slots are strictly increasing.
    pub fn with_day<I>(mut self, weekday: Weekday, slots: I) -> Result<Self>
    where
        I: IntoIterator<Item = SlotTime>,
    {
        let slots: Vec<SlotTime> = slots.into_iter().collect();
        if let Some(pair) = slots.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(EngineError::UnorderedSlots {
                weekday,
                previous: pair[0],
                next: pair[1],
            });
        }
        self.days[weekday.num_days_from_monday() as usize] = slots;
        Ok(self)
    }

    /// Mark `date` as a day off regardless of the weekly template.
    pub fn with_blackout(mut self, date: NaiveDate) -> Self {
        self.blackouts.insert(date);
        self
    }

    /// Candidate slots for `weekday`, in ascending order. Empty when not working.
    pub fn slots_for(&self, weekday: Weekday) -> &[SlotTime] {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// Candidate slots that apply to a concrete `date`, honouring blackouts.
    pub fn slots_on(&self, date: NaiveDate) -> &[SlotTime] {
        if self.is_blackout(date) {
            return &[];
        }
        self.slots_for(date.weekday())
    }

    pub fn is_blackout(&self, date: NaiveDate) -> bool {
        self.blackouts.contains(&date)
    }

    /// Weekdays with at least one candidate slot, Monday first.
    pub fn working_days(&self) -> Vec<Weekday> {
        let mut day = Weekday::Mon;
        let mut working = Vec::new();
        for _ in 0..7 {
            if !self.slots_for(day).is_empty() {
                working.push(day);
            }
            day = day.succ();
        }
        working
    }

    pub fn blackouts(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.blackouts.iter().copied()
    }
}

/// Serialized form of a staff member's schedule, as authored by an admin.
///
/// Weekday keys are written in `locale`:
///
/// ```json
/// {
///   "staff_id": "anna",
///   "locale": "de",
///   "days": { "Dienstag": ["10:30", "12:30", "14:30", "16:30"] },
///   "blackouts": ["2026-12-24"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub staff_id: String,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default, deserialize_with = "unique_day_keys")]
    pub days: BTreeMap<String, Vec<SlotTime>>,
    #[serde(default)]
    pub blackouts: Vec<NaiveDate>,
}

/// Reads the `days` object, rejecting a weekday key that appears twice.
/// A plain map would keep only the last entry.
fn unique_day_keys<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Vec<SlotTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct DaysVisitor;

    impl<'de> Visitor<'de> for DaysVisitor {
        type Value = BTreeMap<String, Vec<SlotTime>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of weekday names to slot times")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut access: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut days = BTreeMap::new();
            while let Some((name, slots)) = access.next_entry::<String, Vec<SlotTime>>()? {
                if days.contains_key(&name) {
                    return Err(de::Error::custom(format!("duplicate weekday key: {}", name)));
                }
                days.insert(name, slots);
            }
            Ok(days)
        }
    }

    deserializer.deserialize_map(DaysVisitor)
}

impl ScheduleDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Translate the localized document into a [`WeeklySchedule`].
    ///
    /// # Errors
    /// - `EngineError::UnknownWeekday` if a key is not a weekday name in `locale`.
    /// - `EngineError::DuplicateWeekday` if two keys name the same weekday.
    /// - `EngineError::UnorderedSlots` if a day's slots are not strictly increasing.
    pub fn to_schedule(&self) -> Result<WeeklySchedule> {
        let mut schedule = WeeklySchedule::new();
        let mut seen: Vec<Weekday> = Vec::new();

        for (name, slots) in &self.days {
            let weekday = locale::parse_weekday(name, self.locale)
                .ok_or_else(|| EngineError::UnknownWeekday(name.clone()))?;
            if seen.contains(&weekday) {
                return Err(EngineError::DuplicateWeekday(weekday));
            }
            seen.push(weekday);
            schedule = schedule.with_day(weekday, slots.iter().copied())?;
        }

        Ok(self
            .blackouts
            .iter()
            .fold(schedule, |schedule, date| schedule.with_blackout(*date)))
    }
}
