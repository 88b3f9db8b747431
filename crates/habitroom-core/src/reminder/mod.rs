//! Reminder planning and dispatch.
//!
//! - [`planner`]: pure derivation of reminder times and trigger instants
//! - [`dispatcher`]: the host capability that arms and cancels reminders

pub mod dispatcher;
pub mod planner;

pub use dispatcher::{ReminderDispatcher, ReminderNotification, ScheduledReminder};
pub use planner::{next_occurrence, plan_reminder_times};

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::habit::{Habit, UnitType};

/// What reminders a habit should have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "times", rename_all = "snake_case")]
pub enum ReminderPlan {
    /// No reminder time set.
    None,
    /// One reminder at the preferred time.
    Single(NaiveTime),
    /// Several reminders spread over the day.
    Smart(Vec<NaiveTime>),
}

impl ReminderPlan {
    /// Pick the plan for `habit`.
    ///
    /// Count habits with a target above one get smart reminders when
    /// `smart_enabled`; every other habit with a reminder time gets a single
    /// reminder at that time.
    pub fn for_habit(habit: &Habit, smart_enabled: bool) -> Self {
        let Some(time) = habit.reminder_time else {
            return ReminderPlan::None;
        };
        match (habit.unit_type, habit.target) {
            (UnitType::Count, Some(target)) if target > 1 && smart_enabled => {
                ReminderPlan::Smart(plan_reminder_times(target, Some(time)))
            }
            _ => ReminderPlan::Single(time),
        }
    }

    pub fn times(&self) -> Vec<NaiveTime> {
        match self {
            ReminderPlan::None => Vec::new(),
            ReminderPlan::Single(time) => vec![*time],
            ReminderPlan::Smart(times) => times.clone(),
        }
    }

    /// Concrete triggers for `habit`, each at its next occurrence after `now`.
    pub fn materialize(&self, habit: &Habit, now: NaiveDateTime) -> Vec<ScheduledReminder> {
        (0u32..)
            .zip(self.times())
            .map(|(slot, time)| ScheduledReminder {
                habit_id: habit.id,
                habit_title: habit.title.clone(),
                slot,
                time_of_day: time,
                trigger_at: next_occurrence(time, now),
            })
            .collect()
    }
}
