use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::HabitId;

/// Every state change made through the repository produces an Event.
/// Observers poll for events and recompute their views from a fresh
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitCreated {
        habit_id: HabitId,
    },
    HabitUpdated {
        habit_id: HabitId,
    },
    HabitArchived {
        habit_id: HabitId,
    },
    HabitUnarchived {
        habit_id: HabitId,
    },
    HabitDeleted {
        habit_id: HabitId,
    },
    EntryRecorded {
        habit_id: HabitId,
        date: NaiveDate,
    },
    EntryDeleted {
        habit_id: HabitId,
        date: NaiveDate,
    },
    RemindersScheduled {
        habit_id: HabitId,
        count: usize,
    },
    RemindersCancelled {
        habit_id: HabitId,
    },
}

/// Buffer of published events, drained by polling.
#[derive(Debug, Default)]
pub struct EventLog {
    pending: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: Event) {
        tracing::debug!(?event, "event published");
        self.pending.push(event);
    }

    /// Take every event published since the last call, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_in_order_and_empties() {
        let mut log = EventLog::new();
        log.publish(Event::HabitCreated { habit_id: 1 });
        log.publish(Event::RemindersScheduled { habit_id: 1, count: 2 });

        let events = log.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], Event::HabitCreated { habit_id: 1 });
        assert!(log.is_empty());
        assert!(log.drain().is_empty());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Event::HabitArchived { habit_id: 9 }).unwrap();
        assert_eq!(json["type"], "HabitArchived");
        assert_eq!(json["habit_id"], 9);
    }
}
