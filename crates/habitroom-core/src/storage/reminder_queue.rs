//! SQLite-backed reminder dispatcher.
//!
//! Stands in for a platform alarm service: scheduled reminders are stored
//! as rows and [`ReminderQueue::fire_due`] turns the ones whose trigger has
//! passed into notifications, re-arming each for its next daily occurrence.

use std::path::Path;

use chrono::{NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection};
use tracing::{debug, info};

use super::{data_dir, migrations, DB_FILE};
use crate::error::{DatabaseError, Result};
use crate::habit::HabitId;
use crate::reminder::{next_occurrence, ReminderDispatcher, ReminderNotification, ScheduledReminder};

const REMINDER_COLUMNS: &str = "habit_id, slot, habit_title, time_of_day, trigger_at";

fn row_to_reminder(row: &rusqlite::Row) -> Result<ScheduledReminder, rusqlite::Error> {
    let time_of_day: NaiveTime = row.get(3)?;
    let trigger_at: NaiveDateTime = row.get(4)?;
    Ok(ScheduledReminder {
        habit_id: row.get(0)?,
        slot: row.get(1)?,
        habit_title: row.get(2)?,
        time_of_day,
        trigger_at,
    })
}

pub struct ReminderQueue {
    conn: Connection,
}

impl ReminderQueue {
    /// Open the queue stored alongside habits in `<data dir>/habitroom.db`.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join(DB_FILE);
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory queue (for tests).
    pub fn open_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// All armed reminders, soonest first.
    pub fn pending(&self) -> Result<Vec<ScheduledReminder>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders ORDER BY trigger_at ASC, habit_id ASC, slot ASC"
        ))?;
        let rows = stmt.query_map([], row_to_reminder)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Armed reminders of one habit, by slot.
    pub fn pending_for_habit(&self, habit_id: HabitId) -> Result<Vec<ScheduledReminder>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE habit_id = ?1 ORDER BY slot ASC"
        ))?;
        let rows = stmt.query_map(params![habit_id], row_to_reminder)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Fire every reminder whose trigger is at or before `now`.
    ///
    /// Each fired reminder is re-armed at the next occurrence of its time of
    /// day after `now`.
    pub fn fire_due(&mut self, now: NaiveDateTime) -> Result<Vec<ReminderNotification>> {
        let tx = self.conn.transaction()?;
        let due = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {REMINDER_COLUMNS} FROM reminders
                 WHERE trigger_at <= ?1
                 ORDER BY trigger_at ASC, habit_id ASC, slot ASC"
            ))?;
            let rows = stmt.query_map(params![now], row_to_reminder)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let mut fired = Vec::with_capacity(due.len());
        for reminder in &due {
            let next = next_occurrence(reminder.time_of_day, now);
            tx.execute(
                "UPDATE reminders SET trigger_at = ?3 WHERE habit_id = ?1 AND slot = ?2",
                params![reminder.habit_id, reminder.slot, next],
            )?;
            debug!(habit_id = reminder.habit_id, slot = reminder.slot, next = %next, "reminder re-armed");
            fired.push(ReminderNotification::from(reminder));
        }
        tx.commit()?;

        if !fired.is_empty() {
            info!(count = fired.len(), "reminders fired");
        }
        Ok(fired)
    }
}

impl ReminderDispatcher for ReminderQueue {
    fn schedule(&mut self, reminder: &ScheduledReminder) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reminders (habit_id, slot, habit_title, time_of_day, trigger_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(habit_id, slot) DO UPDATE SET
                habit_title = excluded.habit_title,
                time_of_day = excluded.time_of_day,
                trigger_at = excluded.trigger_at",
            params![
                reminder.habit_id,
                reminder.slot,
                reminder.habit_title,
                reminder.time_of_day,
                reminder.trigger_at,
            ],
        )?;
        debug!(
            habit_id = reminder.habit_id,
            slot = reminder.slot,
            trigger_at = %reminder.trigger_at,
            "reminder armed"
        );
        Ok(())
    }

    fn cancel_all(&mut self, habit_id: HabitId) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM reminders WHERE habit_id = ?1", params![habit_id])?;
        debug!(habit_id, removed, "reminders cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn reminder(habit_id: HabitId, slot: u32, trigger_at: NaiveDateTime) -> ScheduledReminder {
        ScheduledReminder {
            habit_id,
            habit_title: format!("Habit {habit_id}"),
            slot,
            time_of_day: trigger_at.time(),
            trigger_at,
        }
    }

    #[test]
    fn schedule_replaces_same_slot() {
        let mut queue = ReminderQueue::open_memory().unwrap();
        queue.schedule(&reminder(1, 0, at(1, 9, 0))).unwrap();
        queue.schedule(&reminder(1, 0, at(1, 10, 0))).unwrap();
        queue.schedule(&reminder(1, 1, at(1, 19, 0))).unwrap();

        let pending = queue.pending_for_habit(1).unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].trigger_at, at(1, 10, 0));
    }

    #[test]
    fn cancel_all_removes_every_slot() {
        let mut queue = ReminderQueue::open_memory().unwrap();
        queue.schedule(&reminder(1, 0, at(1, 9, 0))).unwrap();
        queue.schedule(&reminder(1, 1, at(1, 19, 0))).unwrap();
        queue.schedule(&reminder(2, 0, at(1, 8, 0))).unwrap();

        queue.cancel_all(1).unwrap();

        let pending = queue.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].habit_id, 2);
    }

    #[test]
    fn fire_due_notifies_and_rearms() {
        let mut queue = ReminderQueue::open_memory().unwrap();
        queue.schedule(&reminder(1, 0, at(1, 9, 0))).unwrap();
        queue.schedule(&reminder(2, 0, at(1, 18, 0))).unwrap();

        let fired = queue.fire_due(at(1, 9, 0)).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].habit_id, 1);
        assert_eq!(fired[0].title, "Time for Habit 1! \u{1F3AF}");

        let rearmed = queue.pending_for_habit(1).unwrap();
        assert_eq!(rearmed[0].trigger_at, at(2, 9, 0));

        // Nothing else is due until the evening.
        assert!(queue.fire_due(at(1, 12, 0)).unwrap().is_empty());
    }
}
