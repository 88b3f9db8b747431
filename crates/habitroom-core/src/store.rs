//! Habit/entry persistence capability.
//!
//! The repository talks to storage only through [`HabitStore`]; the SQLite
//! implementation lives in [`crate::storage::HabitDb`].

use chrono::NaiveDate;

use crate::error::Result;
use crate::habit::{Entry, Habit, HabitDraft, HabitId};

pub trait HabitStore {
    /// Validate and persist a new habit, returning it with its assigned id.
    fn insert_habit(&self, draft: HabitDraft, created_at: NaiveDate) -> Result<Habit>;

    /// Overwrite the stored habit with the same id.
    fn update_habit(&self, habit: &Habit) -> Result<()>;

    fn get_habit(&self, id: HabitId) -> Result<Option<Habit>>;

    /// Non-archived habits, newest first.
    fn active_habits(&self) -> Result<Vec<Habit>>;

    /// Archived habits ordered by title.
    fn archived_habits(&self) -> Result<Vec<Habit>>;

    /// Non-archived habits whose schedule includes the weekday of `date`.
    fn habits_for_day(&self, date: NaiveDate) -> Result<Vec<Habit>>;

    fn set_archived(&self, id: HabitId, archived: bool) -> Result<()>;

    /// Remove a habit and every entry it owns.
    fn delete_habit(&self, id: HabitId) -> Result<()>;

    /// Insert or replace the entry keyed by (habit, date).
    fn upsert_entry(&self, entry: &Entry) -> Result<()>;

    fn get_entry(&self, habit_id: HabitId, date: NaiveDate) -> Result<Option<Entry>>;

    /// Returns whether an entry was removed.
    fn delete_entry(&self, habit_id: HabitId, date: NaiveDate) -> Result<bool>;

    /// All entries of a habit, newest first.
    fn entries_for_habit(&self, habit_id: HabitId) -> Result<Vec<Entry>>;

    /// Entries of all habits on `date`.
    fn entries_for_date(&self, date: NaiveDate) -> Result<Vec<Entry>>;

    /// Entries of a habit between `start` and `end` inclusive, newest first.
    fn entries_in_range(&self, habit_id: HabitId, start: NaiveDate, end: NaiveDate) -> Result<Vec<Entry>>;
}
