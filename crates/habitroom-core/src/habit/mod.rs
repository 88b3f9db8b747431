//! Habit and entry data model.
//!
//! A [`Habit`] is a tracked behaviour; an [`Entry`] is its outcome on one
//! calendar date. There is at most one entry per (habit, date).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schedule::ScheduleMask;

/// Opaque habit identifier assigned by the store.
pub type HabitId = i64;

/// Whether the user wants to build up or quit the behaviour.
///
/// Informational only; no computation depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HabitMode {
    #[default]
    Build,
    Quit,
}

/// How completion is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    #[default]
    Boolean,
    Count,
}

impl HabitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            HabitMode::Build => "build",
            HabitMode::Quit => "quit",
        }
    }
}

impl UnitType {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Boolean => "boolean",
            UnitType::Count => "count",
        }
    }
}

impl fmt::Display for HabitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "build" => Ok(HabitMode::Build),
            "quit" => Ok(HabitMode::Quit),
            other => Err(ValidationError::InvalidValue {
                field: "mode".to_string(),
                message: format!("expected 'build' or 'quit', got '{other}'"),
            }),
        }
    }
}

impl FromStr for UnitType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boolean" | "bool" => Ok(UnitType::Boolean),
            "count" => Ok(UnitType::Count),
            other => Err(ValidationError::InvalidValue {
                field: "unit_type".to_string(),
                message: format!("expected 'boolean' or 'count', got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub title: String,
    pub mode: HabitMode,
    pub unit_type: UnitType,
    /// Daily goal for count habits. Always `None` for boolean habits.
    pub target: Option<u32>,
    pub schedule: ScheduleMask,
    /// Preferred reminder time of day, if reminders are wanted.
    pub reminder_time: Option<NaiveTime>,
    #[serde(default)]
    pub color: i64,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub archived: bool,
}

impl Habit {
    /// Whether `entry` satisfies this habit's completion rule.
    ///
    /// Count habits complete when the count reaches the target, or when any
    /// count was logged if no target is set. Boolean habits complete when
    /// the entry is `true`. A missing entry is never complete.
    pub fn is_completed_by(&self, entry: Option<&Entry>) -> bool {
        match self.unit_type {
            UnitType::Count => {
                let count = entry.and_then(|e| e.value_count).unwrap_or(0);
                match self.target {
                    Some(target) => count >= target,
                    None => count > 0,
                }
            }
            UnitType::Boolean => entry.and_then(|e| e.value_bool) == Some(true),
        }
    }

    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.schedule.includes_date(date)
    }
}

/// One habit's record for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_bool: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_count: Option<u32>,
}

impl Entry {
    pub fn boolean(habit_id: HabitId, date: NaiveDate, value: bool) -> Self {
        Self {
            habit_id,
            date,
            value_bool: Some(value),
            value_count: None,
        }
    }

    pub fn count(habit_id: HabitId, date: NaiveDate, value: u32) -> Self {
        Self {
            habit_id,
            date,
            value_bool: None,
            value_count: Some(value),
        }
    }
}

/// The value a habit shows for a day, defaulting when no entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Bool(bool),
    Count(u32),
}

/// Input for creating a habit, validated by [`HabitDraft::into_habit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDraft {
    pub title: String,
    #[serde(default)]
    pub mode: HabitMode,
    #[serde(default)]
    pub unit_type: UnitType,
    #[serde(default)]
    pub target: Option<i64>,
    #[serde(default)]
    pub schedule: ScheduleMask,
    #[serde(default)]
    pub reminder_time: Option<NaiveTime>,
    #[serde(default)]
    pub color: i64,
}

impl HabitDraft {
    /// A daily boolean habit with no reminder.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            mode: HabitMode::Build,
            unit_type: UnitType::Boolean,
            target: None,
            schedule: ScheduleMask::daily(),
            reminder_time: None,
            color: 0,
        }
    }

    /// Check the draft and normalize it into a habit with the given identity.
    ///
    /// The title is trimmed and must be non-blank. A target must be positive;
    /// it is dropped for boolean habits.
    pub fn into_habit(self, id: HabitId, created_at: NaiveDate) -> Result<Habit, ValidationError> {
        let title = normalize_title(&self.title)?;
        let target = normalize_target(self.unit_type, self.target)?;
        Ok(Habit {
            id,
            title,
            mode: self.mode,
            unit_type: self.unit_type,
            target,
            schedule: self.schedule,
            reminder_time: self.reminder_time,
            color: self.color,
            created_at,
            archived: false,
        })
    }
}

/// Partial edit of an existing habit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub mode: Option<HabitMode>,
    pub unit_type: Option<UnitType>,
    /// `Some(None)` clears the target.
    pub target: Option<Option<i64>>,
    pub schedule: Option<ScheduleMask>,
    /// `Some(None)` clears the reminder.
    pub reminder_time: Option<Option<NaiveTime>>,
    pub color: Option<i64>,
}

impl HabitPatch {
    /// Apply the patch, returning the edited copy. `habit` is left untouched
    /// when validation fails.
    pub fn apply(&self, habit: &Habit) -> Result<Habit, ValidationError> {
        let mut edited = habit.clone();
        if let Some(title) = &self.title {
            edited.title = normalize_title(title)?;
        }
        if let Some(mode) = self.mode {
            edited.mode = mode;
        }
        if let Some(unit_type) = self.unit_type {
            edited.unit_type = unit_type;
        }
        let raw_target = match self.target {
            Some(target) => target,
            None => edited.target.map(i64::from),
        };
        edited.target = normalize_target(edited.unit_type, raw_target)?;
        if let Some(schedule) = self.schedule {
            edited.schedule = schedule;
        }
        if let Some(reminder_time) = self.reminder_time {
            edited.reminder_time = reminder_time;
        }
        if let Some(color) = self.color {
            edited.color = color;
        }
        Ok(edited)
    }
}

fn normalize_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_target(unit_type: UnitType, target: Option<i64>) -> Result<Option<u32>, ValidationError> {
    if unit_type == UnitType::Boolean {
        return Ok(None);
    }
    match target {
        None => Ok(None),
        Some(t) if t <= 0 => Err(ValidationError::NonPositiveTarget(t)),
        Some(t) => u32::try_from(t)
            .map(Some)
            .map_err(|_| ValidationError::InvalidValue {
                field: "target".to_string(),
                message: format!("{t} is too large"),
            }),
    }
}

/// A habit paired with its entry for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitWithEntry {
    pub habit: Habit,
    pub entry: Option<Entry>,
}

impl HabitWithEntry {
    pub fn is_completed(&self) -> bool {
        self.habit.is_completed_by(self.entry.as_ref())
    }

    /// Logged value for the day, `false` / `0` when nothing was logged.
    pub fn current_value(&self) -> EntryValue {
        match self.habit.unit_type {
            UnitType::Boolean => {
                EntryValue::Bool(self.entry.as_ref().and_then(|e| e.value_bool).unwrap_or(false))
            }
            UnitType::Count => {
                EntryValue::Count(self.entry.as_ref().and_then(|e| e.value_count).unwrap_or(0))
            }
        }
    }
}

/// Row of the "today" view: habit, its entry, progress and streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayHabit {
    pub habit: Habit,
    pub entry: Option<Entry>,
    pub completed: bool,
    pub value: EntryValue,
    pub streak: u32,
}

impl TodayHabit {
    pub fn new(pair: HabitWithEntry, streak: u32) -> Self {
        let completed = pair.is_completed();
        let value = pair.current_value();
        Self {
            habit: pair.habit,
            entry: pair.entry,
            completed,
            value,
            streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn count_habit(target: Option<u32>) -> Habit {
        Habit {
            id: 1,
            title: "Water".into(),
            mode: HabitMode::Build,
            unit_type: UnitType::Count,
            target,
            schedule: ScheduleMask::daily(),
            reminder_time: None,
            color: 0,
            created_at: date(2024, 1, 1),
            archived: false,
        }
    }

    #[test]
    fn count_completion_uses_target() {
        let habit = count_habit(Some(3));
        let d = date(2024, 1, 2);
        assert!(!habit.is_completed_by(Some(&Entry::count(1, d, 2))));
        assert!(habit.is_completed_by(Some(&Entry::count(1, d, 3))));
        assert!(habit.is_completed_by(Some(&Entry::count(1, d, 9))));
        assert!(!habit.is_completed_by(None));
    }

    #[test]
    fn count_without_target_needs_any_count() {
        let habit = count_habit(None);
        let d = date(2024, 1, 2);
        assert!(!habit.is_completed_by(Some(&Entry::count(1, d, 0))));
        assert!(habit.is_completed_by(Some(&Entry::count(1, d, 1))));
    }

    #[test]
    fn boolean_completion_requires_true() {
        let habit = HabitDraft::new("Read").into_habit(2, date(2024, 1, 1)).unwrap();
        let d = date(2024, 1, 2);
        assert!(habit.is_completed_by(Some(&Entry::boolean(2, d, true))));
        assert!(!habit.is_completed_by(Some(&Entry::boolean(2, d, false))));
        // A count logged against a boolean habit does not count.
        assert!(!habit.is_completed_by(Some(&Entry::count(2, d, 5))));
    }

    #[test]
    fn draft_rejects_blank_title_and_bad_target() {
        assert_eq!(
            HabitDraft::new("   ").into_habit(1, date(2024, 1, 1)),
            Err(ValidationError::BlankTitle)
        );

        let mut draft = HabitDraft::new("Push-ups");
        draft.unit_type = UnitType::Count;
        draft.target = Some(0);
        assert_eq!(
            draft.into_habit(1, date(2024, 1, 1)),
            Err(ValidationError::NonPositiveTarget(0))
        );
    }

    #[test]
    fn draft_drops_target_for_boolean_habits() {
        let mut draft = HabitDraft::new("  Meditate ");
        draft.target = Some(5);
        let habit = draft.into_habit(1, date(2024, 1, 1)).unwrap();
        assert_eq!(habit.title, "Meditate");
        assert_eq!(habit.target, None);
    }

    #[test]
    fn patch_switching_to_boolean_clears_target() {
        let habit = count_habit(Some(4));
        let patch = HabitPatch {
            unit_type: Some(UnitType::Boolean),
            ..Default::default()
        };
        let edited = patch.apply(&habit).unwrap();
        assert_eq!(edited.unit_type, UnitType::Boolean);
        assert_eq!(edited.target, None);
    }

    #[test]
    fn patch_can_clear_reminder_and_keep_other_fields() {
        let mut habit = count_habit(Some(4));
        habit.reminder_time = NaiveTime::from_hms_opt(9, 0, 0);
        let patch = HabitPatch {
            reminder_time: Some(None),
            ..Default::default()
        };
        let edited = patch.apply(&habit).unwrap();
        assert_eq!(edited.reminder_time, None);
        assert_eq!(edited.target, Some(4));
        assert_eq!(edited.title, "Water");
    }

    #[test]
    fn current_value_defaults_when_no_entry() {
        let pair = HabitWithEntry {
            habit: count_habit(Some(2)),
            entry: None,
        };
        assert_eq!(pair.current_value(), EntryValue::Count(0));
        assert!(!pair.is_completed());
    }

    #[test]
    fn mode_and_unit_type_parse_case_insensitively() {
        assert_eq!("QUIT".parse::<HabitMode>().unwrap(), HabitMode::Quit);
        assert_eq!("count".parse::<UnitType>().unwrap(), UnitType::Count);
        assert!("sometimes".parse::<HabitMode>().is_err());
    }
}
