//! SQLite-based habit and entry storage.
//!
//! Provides persistent storage for:
//! - Habit definitions (active and archived)
//! - Daily entries, one per habit and date

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{data_dir, migrations, DB_FILE};
use crate::error::{DatabaseError, Result, ValidationError};
use crate::habit::{Entry, Habit, HabitDraft, HabitId, HabitMode, UnitType};
use crate::schedule::{day_bit, ScheduleMask};
use crate::store::HabitStore;

const HABIT_COLUMNS: &str =
    "id, title, mode, unit_type, target, schedule, reminder_time, color, created_at, archived";

const ENTRY_COLUMNS: &str = "habit_id, local_date, value_bool, value_count";

// === Helper Functions ===

fn corrupt(column: &str, value: &str) -> FromSqlError {
    FromSqlError::Other(Box::new(DatabaseError::CorruptValue {
        column: column.to_string(),
        value: value.to_string(),
    }))
}

impl FromSql for HabitMode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse().map_err(|_| corrupt("mode", text))
    }
}

impl FromSql for UnitType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse().map_err(|_| corrupt("unit_type", text))
    }
}

/// Build a Habit from a database row selected with `HABIT_COLUMNS`
fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
    let schedule: u32 = row.get(5)?;
    let reminder_time: Option<NaiveTime> = row.get(6)?;
    let created_at: NaiveDate = row.get(8)?;

    Ok(Habit {
        id: row.get(0)?,
        title: row.get(1)?,
        mode: row.get(2)?,
        unit_type: row.get(3)?,
        target: row.get(4)?,
        schedule: ScheduleMask(schedule),
        reminder_time,
        color: row.get(7)?,
        created_at,
        archived: row.get(9)?,
    })
}

/// Build an Entry from a database row selected with `ENTRY_COLUMNS`
fn row_to_entry(row: &rusqlite::Row) -> Result<Entry, rusqlite::Error> {
    Ok(Entry {
        habit_id: row.get(0)?,
        date: row.get(1)?,
        value_bool: row.get(2)?,
        value_count: row.get(3)?,
    })
}

/// SQLite database for habits and entries.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Open the database at `<data dir>/habitroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join(DB_FILE);
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn query_habits<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_habit)?;
        let habits = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    fn query_entries<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_entry)?;
        let entries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl HabitStore for HabitDb {
    fn insert_habit(&self, draft: HabitDraft, created_at: NaiveDate) -> Result<Habit> {
        // Validate before touching the table; the real id comes from SQLite.
        let habit = draft.into_habit(0, created_at)?;
        self.conn.execute(
            "INSERT INTO habits (title, mode, unit_type, target, schedule, reminder_time, color, created_at, archived)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)",
            params![
                habit.title,
                habit.mode.as_str(),
                habit.unit_type.as_str(),
                habit.target,
                habit.schedule.bits(),
                habit.reminder_time,
                habit.color,
                habit.created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(habit_id = id, title = %habit.title, "habit created");
        Ok(Habit { id, ..habit })
    }

    fn update_habit(&self, habit: &Habit) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE habits
             SET title = ?2, mode = ?3, unit_type = ?4, target = ?5, schedule = ?6,
                 reminder_time = ?7, color = ?8, archived = ?9
             WHERE id = ?1",
            params![
                habit.id,
                habit.title,
                habit.mode.as_str(),
                habit.unit_type.as_str(),
                habit.target,
                habit.schedule.bits(),
                habit.reminder_time,
                habit.color,
                habit.archived,
            ],
        )?;
        if changed == 0 {
            return Err(ValidationError::HabitNotFound(habit.id).into());
        }
        debug!(habit_id = habit.id, "habit updated");
        Ok(())
    }

    fn get_habit(&self, id: HabitId) -> Result<Option<Habit>> {
        let habit = self
            .conn
            .query_row(
                &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"),
                params![id],
                row_to_habit,
            )
            .optional()?;
        Ok(habit)
    }

    fn active_habits(&self) -> Result<Vec<Habit>> {
        self.query_habits(
            &format!(
                "SELECT {HABIT_COLUMNS} FROM habits
                 WHERE archived = 0
                 ORDER BY created_at DESC, id DESC"
            ),
            [],
        )
    }

    fn archived_habits(&self) -> Result<Vec<Habit>> {
        self.query_habits(
            &format!(
                "SELECT {HABIT_COLUMNS} FROM habits
                 WHERE archived = 1
                 ORDER BY title ASC, id ASC"
            ),
            [],
        )
    }

    fn habits_for_day(&self, date: NaiveDate) -> Result<Vec<Habit>> {
        use chrono::Datelike;
        self.query_habits(
            &format!(
                "SELECT {HABIT_COLUMNS} FROM habits
                 WHERE archived = 0 AND (schedule & ?1) != 0
                 ORDER BY created_at DESC, id DESC"
            ),
            params![day_bit(date.weekday())],
        )
    }

    fn set_archived(&self, id: HabitId, archived: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE habits SET archived = ?2 WHERE id = ?1",
            params![id, archived],
        )?;
        if changed == 0 {
            return Err(ValidationError::HabitNotFound(id).into());
        }
        info!(habit_id = id, archived, "habit archive flag changed");
        Ok(())
    }

    fn delete_habit(&self, id: HabitId) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(ValidationError::HabitNotFound(id).into());
        }
        info!(habit_id = id, "habit deleted");
        Ok(())
    }

    fn upsert_entry(&self, entry: &Entry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO entries (habit_id, local_date, value_bool, value_count)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(habit_id, local_date) DO UPDATE SET
                value_bool = excluded.value_bool,
                value_count = excluded.value_count",
            params![entry.habit_id, entry.date, entry.value_bool, entry.value_count],
        )?;
        debug!(habit_id = entry.habit_id, date = %entry.date, "entry stored");
        Ok(())
    }

    fn get_entry(&self, habit_id: HabitId, date: NaiveDate) -> Result<Option<Entry>> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE habit_id = ?1 AND local_date = ?2"),
                params![habit_id, date],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    fn delete_entry(&self, habit_id: HabitId, date: NaiveDate) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM entries WHERE habit_id = ?1 AND local_date = ?2",
            params![habit_id, date],
        )?;
        Ok(changed > 0)
    }

    fn entries_for_habit(&self, habit_id: HabitId) -> Result<Vec<Entry>> {
        self.query_entries(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE habit_id = ?1
                 ORDER BY local_date DESC"
            ),
            params![habit_id],
        )
    }

    fn entries_for_date(&self, date: NaiveDate) -> Result<Vec<Entry>> {
        self.query_entries(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE local_date = ?1
                 ORDER BY habit_id ASC"
            ),
            params![date],
        )
    }

    fn entries_in_range(&self, habit_id: HabitId, start: NaiveDate, end: NaiveDate) -> Result<Vec<Entry>> {
        self.query_entries(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE habit_id = ?1 AND local_date BETWEEN ?2 AND ?3
                 ORDER BY local_date DESC"
            ),
            params![habit_id, start, end],
        )
    }
}
