//! # Habitroom Core Library
//!
//! This library provides the core logic for the Habitroom habit tracker.
//! All operations are available through the standalone CLI binary, which is
//! a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Schedule**: weekday bitmask codec deciding which days a habit is active
//! - **Streak**: backward walk counting consecutive completed scheduled days
//! - **Reminder**: reminder-time planning and the dispatcher capability
//! - **Storage**: SQLite habit/entry store, SQLite reminder queue and
//!   TOML-based configuration
//! - **Repository**: coordinator composing the pieces above
//!
//! ## Key Components
//!
//! - [`HabitRepository`]: create/edit/archive habits, log entries, compute streaks
//! - [`HabitStore`] / [`ReminderDispatcher`]: injected capabilities
//! - [`HabitDb`] / [`ReminderQueue`]: their SQLite implementations
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod habit;
pub mod reminder;
pub mod repository;
pub mod schedule;
pub mod storage;
pub mod store;
pub mod streak;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, EventLog};
pub use habit::{Entry, EntryValue, Habit, HabitDraft, HabitId, HabitMode, HabitPatch, HabitWithEntry, TodayHabit, UnitType};
pub use reminder::{
    next_occurrence, plan_reminder_times, ReminderDispatcher, ReminderNotification, ReminderPlan,
    ScheduledReminder,
};
pub use repository::HabitRepository;
pub use schedule::{ScheduleMask, DAILY_SCHEDULE, WEEKDAYS};
pub use storage::{Config, HabitDb, ReminderQueue};
pub use store::HabitStore;
pub use streak::{current_streak, StreakCalculator, StreakConfig};
