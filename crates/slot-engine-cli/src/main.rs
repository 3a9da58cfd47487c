//! `slots` CLI — inspect staff availability and submit reservations from JSON files.
//!
//! ## Usage
//!
//! ```sh
//! # Slot list and classification for one date
//! slots day --schedule anna.json --bookings bookings.json --date 2026-03-17
//!
//! # Two weeks of calendar classifications, as JSON
//! slots calendar --schedule anna.json --bookings bookings.json --days 14 --json
//!
//! # Reserve a slot and write the updated booking list
//! slots reserve --schedule anna.json --bookings bookings.json \
//!   --date 2026-03-17 --time 12:30 --customer cust-7 --package cut --price 4500 \
//!   -o bookings.json
//!
//! # Pin "today" and the horizon instead of reading the clock
//! slots --today 2026-03-16 --horizon-days 30 day --schedule anna.json \
//!   --bookings bookings.json --date 2026-03-17
//! ```
//!
//! Set `RUST_LOG=slot_engine=debug` to trace reservation decisions on stderr.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use slot_engine::availability::bookings_for_staff;
use slot_engine::booking::bookings_from_json;
use slot_engine::locale::weekday_name;
use slot_engine::{
    calendar_range, classify_day_with_window, get_slots_for_date_with_window, submit_booking,
    Booking, BookingStatus, DayAvailability, EngineError, InMemoryBookingStore, ScheduleDocument,
    SlotAvailability, SlotTime, WeeklySchedule,
};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Appointment slot availability for salon staff"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (horizon_days, locale, timezone)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this date as today instead of reading the clock (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// IANA timezone used to determine today (overrides the config file)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Booking horizon in days (overrides the config file)
    #[arg(long, global = true)]
    horizon_days: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the slots and classification for one date
    Day {
        /// Staff schedule JSON file
        #[arg(short, long)]
        schedule: PathBuf,
        /// Bookings JSON file (all staff; filtered by the schedule's staff_id)
        #[arg(short, long)]
        bookings: PathBuf,
        /// Date to inspect (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Classify a range of dates for a calendar view
    Calendar {
        /// Staff schedule JSON file
        #[arg(short, long)]
        schedule: PathBuf,
        /// Bookings JSON file (all staff; filtered by the schedule's staff_id)
        #[arg(short, long)]
        bookings: PathBuf,
        /// First date of the range (defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Number of days to show
        #[arg(long, default_value_t = 14)]
        days: u32,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Reserve a slot and write the updated bookings list
    Reserve {
        /// Staff schedule JSON file
        #[arg(short, long)]
        schedule: PathBuf,
        /// Bookings JSON file (all staff)
        #[arg(short, long)]
        bookings: PathBuf,
        /// Appointment date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        /// Appointment time (HH:MM)
        #[arg(short, long)]
        time: String,
        /// Customer reference
        #[arg(long)]
        customer: String,
        /// Package reference
        #[arg(long)]
        package: String,
        /// Total price in cents
        #[arg(long)]
        price: u64,
        /// Initial status of the new booking
        #[arg(long, value_enum, default_value_t = InitialStatus::Pending)]
        status: InitialStatus,
        /// Output file for the updated bookings (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InitialStatus {
    Pending,
    Confirmed,
}

impl From<InitialStatus> for BookingStatus {
    fn from(s: InitialStatus) -> Self {
        match s {
            InitialStatus::Pending => BookingStatus::Pending,
            InitialStatus::Confirmed => BookingStatus::Confirmed,
        }
    }
}

#[derive(Serialize)]
struct DayReport<'a> {
    staff_id: &'a str,
    date: NaiveDate,
    weekday: &'static str,
    classification: DayAvailability,
    selectable: bool,
    slots: Vec<SlotAvailability>,
}

#[derive(Serialize)]
struct CalendarEntry {
    date: NaiveDate,
    weekday: &'static str,
    classification: DayAvailability,
    selectable: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(tz) = cli.timezone {
        config.timezone = tz;
    }
    if let Some(days) = cli.horizon_days {
        config.horizon_days = days;
    }
    let today = config.today(cli.today)?;
    let window = config.window();
    tracing::debug!(%today, horizon_days = window.horizon_days, "resolved configuration");

    match cli.command {
        Commands::Day {
            schedule,
            bookings,
            date,
            json,
        } => {
            let (staff_id, schedule) = load_schedule(&schedule)?;
            let existing = load_staff_bookings(&bookings, &staff_id)?;

            let slots = get_slots_for_date_with_window(&schedule, date, &existing, today, window);
            let classification = classify_day_with_window(&schedule, date, &existing, today, window);
            let report = DayReport {
                staff_id: &staff_id,
                date,
                weekday: weekday_name(date.weekday(), config.locale),
                classification,
                selectable: classification.is_selectable(),
                slots,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_day(&report);
            }
        }
        Commands::Calendar {
            schedule,
            bookings,
            from,
            days,
            json,
        } => {
            let (staff_id, schedule) = load_schedule(&schedule)?;
            let existing = load_staff_bookings(&bookings, &staff_id)?;
            let from = from.unwrap_or(today);

            let entries: Vec<CalendarEntry> =
                calendar_range(&schedule, from, days, &existing, today, window)
                    .into_iter()
                    .map(|(date, classification)| CalendarEntry {
                        date,
                        weekday: weekday_name(date.weekday(), config.locale),
                        classification,
                        selectable: classification.is_selectable(),
                    })
                    .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for e in &entries {
                    println!(
                        "{}  {:<10}  {:<12}{}",
                        e.date,
                        e.weekday,
                        e.classification.as_str(),
                        if e.selectable { "" } else { "  (disabled)" }
                    );
                }
            }
        }
        Commands::Reserve {
            schedule,
            bookings,
            date,
            time,
            customer,
            package,
            price,
            status,
            output,
        } => {
            let (staff_id, schedule) = load_schedule(&schedule)?;
            let all = load_bookings(&bookings)?;
            let store = InMemoryBookingStore::from_bookings(all)
                .context("Bookings file already contains a double-booked slot")?;

            let time: SlotTime = time.parse()?;
            let booking = Booking {
                staff_id,
                date,
                time,
                status: status.into(),
                customer_id: customer,
                package_id: package,
                total_price_cents: price,
            };

            match submit_booking(&store, &schedule, booking, today, window) {
                Ok(id) => eprintln!("Reserved {} on {} (booking #{})", time, date, id),
                Err(EngineError::Conflict(conflict)) => {
                    anyhow::bail!("{}. Please pick another time.", conflict)
                }
                Err(e) => return Err(e).context("Failed to reserve slot"),
            }

            let updated = serde_json::to_string_pretty(&store.snapshot()?)?;
            write_output(output.as_deref(), &updated)?;
        }
    }

    Ok(())
}

fn print_day(report: &DayReport<'_>) {
    println!(
        "{} {} ({}): {}",
        report.weekday,
        report.date,
        report.staff_id,
        report.classification.as_str()
    );
    if report.slots.is_empty() {
        println!("  no slots");
    }
    for slot in &report.slots {
        let label = if slot.is_available { "available" } else { "unavailable" };
        println!("  {}  {}", slot.time, label);
    }
}

fn load_schedule(path: &Path) -> Result<(String, WeeklySchedule)> {
    let raw = read_file(path)?;
    let doc = ScheduleDocument::from_json(&raw)
        .with_context(|| format!("Invalid schedule file: {}", path.display()))?;
    let schedule = doc
        .to_schedule()
        .with_context(|| format!("Invalid schedule file: {}", path.display()))?;
    Ok((doc.staff_id, schedule))
}

fn load_bookings(path: &Path) -> Result<Vec<Booking>> {
    let raw = read_file(path)?;
    bookings_from_json(&raw).with_context(|| format!("Invalid bookings file: {}", path.display()))
}

fn load_staff_bookings(path: &Path, staff_id: &str) -> Result<Vec<Booking>> {
    let all = load_bookings(path)?;
    Ok(bookings_for_staff(&all, staff_id).cloned().collect())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
