//! Configuration for the `slots` CLI.
//!
//! Values come from an optional JSON file (`--config`), then command-line flags
//! override individual fields.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use slot_engine::availability::DEFAULT_HORIZON_DAYS;
use slot_engine::{clock, BookingWindow, Locale};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Days past today that can still be booked.
    pub horizon_days: u32,
    /// Locale for weekday names in human-readable output.
    pub locale: Locale,
    /// IANA timezone of the salon; decides what "today" is.
    pub timezone: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            locale: Locale::default(),
            timezone: "UTC".to_string(),
        }
    }
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn window(&self) -> BookingWindow {
        BookingWindow::new(self.horizon_days)
    }

    pub fn tz(&self) -> Result<Tz> {
        Ok(clock::parse_timezone(&self.timezone)?)
    }

    /// `pinned` if given, otherwise the current date in the configured timezone.
    pub fn today(&self, pinned: Option<NaiveDate>) -> Result<NaiveDate> {
        match pinned {
            Some(date) => Ok(date),
            None => Ok(clock::today_in(self.tz()?)),
        }
    }
}
