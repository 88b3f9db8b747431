//! Weekday schedule codec.
//!
//! A habit's active days are stored as a 7-bit mask, Monday in the lowest
//! bit and Sunday in the highest. Bits above the seventh are carried through
//! untouched but never consulted.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every day of the week.
pub const DAILY_SCHEDULE: u32 = 127;

/// Monday through Friday.
pub const WEEKDAYS: u32 = 31;

/// Saturday and Sunday.
pub const WEEKENDS: u32 = 96;

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Bit assigned to a weekday: Monday = 1, Tuesday = 2, ... Sunday = 64.
pub fn day_bit(day: Weekday) -> u32 {
    1 << day.num_days_from_monday()
}

/// Whether `day` is active in `mask`.
pub fn is_scheduled(mask: u32, day: Weekday) -> bool {
    mask & day_bit(day) != 0
}

/// OR together the bits of every day in `days`. An empty set encodes to 0.
pub fn encode<I>(days: I) -> u32
where
    I: IntoIterator<Item = Weekday>,
{
    days.into_iter().fold(0, |mask, day| mask | day_bit(day))
}

/// Days active in `mask`, Monday first.
pub fn decode(mask: u32) -> Vec<Weekday> {
    ALL_DAYS
        .iter()
        .copied()
        .filter(|day| is_scheduled(mask, *day))
        .collect()
}

/// Typed wrapper around a schedule bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleMask(pub u32);

impl ScheduleMask {
    pub const fn daily() -> Self {
        Self(DAILY_SCHEDULE)
    }

    pub const fn weekdays() -> Self {
        Self(WEEKDAYS)
    }

    pub fn from_days<I>(days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        Self(encode(days))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, day: Weekday) -> bool {
        is_scheduled(self.0, day)
    }

    /// Whether the weekday of `date` is active.
    pub fn includes_date(self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn days(self) -> Vec<Weekday> {
        decode(self.0)
    }

    /// True when no weekday bit is set.
    pub fn is_empty(self) -> bool {
        self.0 & DAILY_SCHEDULE == 0
    }
}

impl Default for ScheduleMask {
    fn default() -> Self {
        Self::daily()
    }
}

impl fmt::Display for ScheduleMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 & DAILY_SCHEDULE {
            DAILY_SCHEDULE => f.write_str("daily"),
            WEEKDAYS => f.write_str("weekdays"),
            WEEKENDS => f.write_str("weekends"),
            0 => f.write_str("none"),
            _ => {
                let names: Vec<String> = self
                    .days()
                    .iter()
                    .map(|d| d.to_string().to_lowercase())
                    .collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

impl FromStr for ScheduleMask {
    type Err = ValidationError;

    /// Accepts `daily`, `weekdays`, `weekends`, `none`, or a comma-separated
    /// list of day names (`mon,wed,fri`, `monday,friday`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        match trimmed.as_str() {
            "daily" | "all" => return Ok(Self(DAILY_SCHEDULE)),
            "weekdays" => return Ok(Self(WEEKDAYS)),
            "weekends" => return Ok(Self(WEEKENDS)),
            "none" | "" => return Ok(Self(0)),
            _ => {}
        }

        let mut days = Vec::new();
        for part in trimmed.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let day = part
                .parse::<Weekday>()
                .map_err(|_| ValidationError::InvalidValue {
                    field: "days".to_string(),
                    message: format!("unknown weekday '{part}'"),
                })?;
            days.push(day);
        }
        Ok(Self::from_days(days))
    }
}
