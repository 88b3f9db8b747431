pub mod config;
pub mod entry;
pub mod habit;
pub mod reminder;
pub mod streak;
pub mod today;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use habitroom_core::{Config, HabitDb, HabitRepository, ReminderQueue};

pub type Repository = HabitRepository<HabitDb, ReminderQueue>;

/// Repository over the on-disk store and reminder queue, honoring config.
pub fn open_repository() -> Result<Repository, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(HabitRepository::with_config(
        HabitDb::open()?,
        ReminderQueue::open()?,
        &config,
    ))
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a wall-clock time given as `HH:MM`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
