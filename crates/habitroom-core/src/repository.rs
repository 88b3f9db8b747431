//! Habit repository: the coordinator between storage, the streak
//! calculator and reminder dispatch.
//!
//! Both collaborators are injected. Every mutation publishes an [`Event`]
//! that observers collect with [`HabitRepository::take_events`].

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::error::{Result, ValidationError};
use crate::events::{Event, EventLog};
use crate::habit::{
    Entry, Habit, HabitDraft, HabitId, HabitPatch, HabitWithEntry, TodayHabit, UnitType,
};
use crate::reminder::{ReminderDispatcher, ReminderPlan};
use crate::storage::{Config, ReminderSettings};
use crate::store::HabitStore;
use crate::streak::StreakCalculator;

pub struct HabitRepository<S, D> {
    store: S,
    dispatcher: D,
    streaks: StreakCalculator,
    reminders: ReminderSettings,
    events: EventLog,
}

impl<S: HabitStore, D: ReminderDispatcher> HabitRepository<S, D> {
    /// Repository with default streak and reminder settings.
    pub fn new(store: S, dispatcher: D) -> Self {
        Self::with_config(store, dispatcher, &Config::default())
    }

    pub fn with_config(store: S, dispatcher: D, config: &Config) -> Self {
        Self {
            store,
            dispatcher,
            streaks: StreakCalculator::with_config(config.streak),
            reminders: config.reminders,
            events: EventLog::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// Events published since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    // === Habits ===

    /// Persist a new habit and arm its reminders.
    pub fn create_habit(&mut self, draft: HabitDraft, now: NaiveDateTime) -> Result<Habit> {
        let habit = self.store.insert_habit(draft, now.date())?;
        self.events.publish(Event::HabitCreated { habit_id: habit.id });
        self.schedule_reminders(&habit, now)?;
        Ok(habit)
    }

    /// Apply `patch` to a habit, then replace its reminders.
    pub fn update_habit(&mut self, id: HabitId, patch: &HabitPatch, now: NaiveDateTime) -> Result<Habit> {
        let current = self.get_habit(id)?;
        let edited = patch.apply(&current)?;
        self.store.update_habit(&edited)?;
        self.events.publish(Event::HabitUpdated { habit_id: id });

        self.cancel_reminders(id)?;
        if !edited.archived {
            self.schedule_reminders(&edited, now)?;
        }
        Ok(edited)
    }

    /// Hide a habit from the active views and silence it. History is kept.
    pub fn archive_habit(&mut self, id: HabitId) -> Result<()> {
        self.store.set_archived(id, true)?;
        self.events.publish(Event::HabitArchived { habit_id: id });
        self.cancel_reminders(id)
    }

    /// Restore an archived habit and re-arm its reminders.
    pub fn unarchive_habit(&mut self, id: HabitId, now: NaiveDateTime) -> Result<Habit> {
        self.store.set_archived(id, false)?;
        self.events.publish(Event::HabitUnarchived { habit_id: id });
        let habit = self.get_habit(id)?;
        self.schedule_reminders(&habit, now)?;
        Ok(habit)
    }

    /// Remove a habit, its entries and its reminders for good.
    pub fn delete_habit(&mut self, id: HabitId) -> Result<()> {
        self.cancel_reminders(id)?;
        self.store.delete_habit(id)?;
        self.events.publish(Event::HabitDeleted { habit_id: id });
        Ok(())
    }

    /// Look up a habit, failing when it does not exist.
    pub fn get_habit(&self, id: HabitId) -> Result<Habit> {
        self.store
            .get_habit(id)?
            .ok_or_else(|| ValidationError::HabitNotFound(id).into())
    }

    pub fn active_habits(&self) -> Result<Vec<Habit>> {
        self.store.active_habits()
    }

    pub fn archived_habits(&self) -> Result<Vec<Habit>> {
        self.store.archived_habits()
    }

    /// Scheduled, non-archived habits for `date` with entry, progress and streak.
    pub fn habits_for_day(&self, date: NaiveDate) -> Result<Vec<TodayHabit>> {
        let habits = self.store.habits_for_day(date)?;
        let entries = self.store.entries_for_date(date)?;

        habits
            .into_iter()
            .map(|habit| -> Result<TodayHabit> {
                let entry = entries.iter().find(|e| e.habit_id == habit.id).cloned();
                let streak = self.streak_of(&habit, date)?;
                Ok(TodayHabit::new(HabitWithEntry { habit, entry }, streak))
            })
            .collect()
    }

    // === Streaks ===

    /// Current streak of a habit ending at `date`. Unknown habits have none.
    pub fn streak_for_habit(&self, id: HabitId, date: NaiveDate) -> Result<u32> {
        match self.store.get_habit(id)? {
            Some(habit) => self.streak_of(&habit, date),
            None => Ok(0),
        }
    }

    fn streak_of(&self, habit: &Habit, date: NaiveDate) -> Result<u32> {
        let start = self.streaks.window_start(date);
        let entries = self.store.entries_in_range(habit.id, start, date)?;
        Ok(self.streaks.current_streak(habit, &entries, date))
    }

    // === Entries ===

    /// Flip a boolean habit's value for `date`. A day with no entry becomes `true`.
    pub fn toggle_boolean(&mut self, id: HabitId, date: NaiveDate) -> Result<Entry> {
        let habit = self.get_habit(id)?;
        require_unit(&habit, UnitType::Boolean)?;

        let current = self
            .store
            .get_entry(id, date)?
            .and_then(|e| e.value_bool)
            .unwrap_or(false);
        let entry = Entry::boolean(id, date, !current);
        self.record(entry)
    }

    /// Replace a count habit's value for `date`.
    pub fn set_count(&mut self, id: HabitId, date: NaiveDate, value: u32) -> Result<Entry> {
        let habit = self.get_habit(id)?;
        require_unit(&habit, UnitType::Count)?;
        self.record(Entry::count(id, date, value))
    }

    /// Add `delta` to a count habit's value for `date`, never going below zero.
    pub fn increment_count(&mut self, id: HabitId, date: NaiveDate, delta: i64) -> Result<Entry> {
        let habit = self.get_habit(id)?;
        require_unit(&habit, UnitType::Count)?;

        let current = self
            .store
            .get_entry(id, date)?
            .and_then(|e| e.value_count)
            .unwrap_or(0);
        let next = (i64::from(current) + delta).clamp(0, i64::from(u32::MAX)) as u32;
        self.record(Entry::count(id, date, next))
    }

    /// Returns whether there was an entry to delete.
    pub fn delete_entry(&mut self, id: HabitId, date: NaiveDate) -> Result<bool> {
        let removed = self.store.delete_entry(id, date)?;
        if removed {
            self.events.publish(Event::EntryDeleted { habit_id: id, date });
        }
        Ok(removed)
    }

    pub fn get_entry(&self, id: HabitId, date: NaiveDate) -> Result<Option<Entry>> {
        self.store.get_entry(id, date)
    }

    pub fn entries_for_habit(&self, id: HabitId) -> Result<Vec<Entry>> {
        self.store.entries_for_habit(id)
    }

    pub fn entries_in_range(&self, id: HabitId, start: NaiveDate, end: NaiveDate) -> Result<Vec<Entry>> {
        self.store.entries_in_range(id, start, end)
    }

    fn record(&mut self, entry: Entry) -> Result<Entry> {
        self.store.upsert_entry(&entry)?;
        self.events.publish(Event::EntryRecorded {
            habit_id: entry.habit_id,
            date: entry.date,
        });
        Ok(entry)
    }

    // === Reminders ===

    /// The plan that applies to `habit` under the current settings.
    pub fn reminder_plan(&self, habit: &Habit) -> ReminderPlan {
        if !self.reminders.enabled {
            return ReminderPlan::None;
        }
        ReminderPlan::for_habit(habit, self.reminders.smart)
    }

    fn schedule_reminders(&mut self, habit: &Habit, now: NaiveDateTime) -> Result<usize> {
        let plan = self.reminder_plan(habit);
        let reminders = plan.materialize(habit, now);
        if reminders.is_empty() {
            debug!(habit_id = habit.id, "no reminders to schedule");
            return Ok(0);
        }

        for reminder in &reminders {
            self.dispatcher.schedule(reminder)?;
        }
        info!(habit_id = habit.id, count = reminders.len(), ?plan, "reminders scheduled");
        self.events.publish(Event::RemindersScheduled {
            habit_id: habit.id,
            count: reminders.len(),
        });
        Ok(reminders.len())
    }

    fn cancel_reminders(&mut self, id: HabitId) -> Result<()> {
        self.dispatcher.cancel_all(id)?;
        self.events.publish(Event::RemindersCancelled { habit_id: id });
        Ok(())
    }
}

fn require_unit(habit: &Habit, expected: UnitType) -> Result<()> {
    if habit.unit_type == expected {
        return Ok(());
    }
    Err(ValidationError::WrongUnitType {
        habit_id: habit.id,
        expected: habit.unit_type.as_str(),
        attempted: expected.as_str(),
    }
    .into())
}
