use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::habit::HabitId;

/// One concrete reminder trigger for a habit.
///
/// `slot` distinguishes the reminders of a habit with several per day; a
/// single reminder uses slot 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub habit_id: HabitId,
    pub habit_title: String,
    pub slot: u32,
    pub time_of_day: NaiveTime,
    pub trigger_at: NaiveDateTime,
}

/// User-visible content shown when a reminder fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderNotification {
    pub habit_id: HabitId,
    pub title: String,
    pub body: String,
}

impl ReminderNotification {
    pub fn for_habit(habit_id: HabitId, habit_title: &str) -> Self {
        Self {
            habit_id,
            title: format!("Time for {habit_title}! \u{1F3AF}"),
            body: "Tap to check in on your habit".to_string(),
        }
    }
}

impl From<&ScheduledReminder> for ReminderNotification {
    fn from(reminder: &ScheduledReminder) -> Self {
        Self::for_habit(reminder.habit_id, &reminder.habit_title)
    }
}

/// Host capability that arms and disarms timed reminders.
///
/// Implementations own delivery; the repository only decides what to
/// schedule and when to cancel.
pub trait ReminderDispatcher {
    /// Arm `reminder`, replacing any reminder with the same habit and slot.
    fn schedule(&mut self, reminder: &ScheduledReminder) -> Result<()>;

    /// Disarm every reminder belonging to `habit_id`.
    fn cancel_all(&mut self, habit_id: HabitId) -> Result<()>;
}
