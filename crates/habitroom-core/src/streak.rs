//! Current-streak calculation.
//!
//! Walks backward one day at a time from a reference date, skipping days the
//! habit is not scheduled on and counting completed scheduled days until the
//! first scheduled day that is not completed.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::habit::{Entry, Habit};

/// Default number of days before the reference date the walk may reach.
pub const DEFAULT_HORIZON_DAYS: u32 = 1000;

/// Largest horizon accepted from configuration, roughly a century.
pub const MAX_HORIZON_DAYS: u32 = 36_500;

/// Configuration for streak calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    /// Oldest day examined, counted back from the reference date
    pub horizon_days: u32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

/// Streak calculator
#[derive(Debug, Clone, Default)]
pub struct StreakCalculator {
    config: StreakConfig,
}

impl StreakCalculator {
    /// Create a new calculator with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: StreakConfig) -> Self {
        Self { config }
    }

    /// First date the walk may examine for `reference`, clamped to the
    /// earliest representable date.
    pub fn window_start(&self, reference: NaiveDate) -> NaiveDate {
        reference
            .checked_sub_signed(Duration::days(i64::from(self.config.horizon_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Count consecutive completed scheduled days ending at `reference`.
    ///
    /// `reference` itself is part of the walk, so a scheduled but not yet
    /// completed reference day yields 0. Unscheduled days are skipped
    /// without looking at entries. `entries` must hold at most one entry per
    /// date; when duplicates exist the last one wins.
    pub fn current_streak(&self, habit: &Habit, entries: &[Entry], reference: NaiveDate) -> u32 {
        let by_date: HashMap<NaiveDate, &Entry> = entries.iter().map(|e| (e.date, e)).collect();
        let oldest = self.window_start(reference);

        let mut streak = 0;
        let mut day = reference;
        while day >= oldest {
            if habit.is_scheduled_on(day) {
                if habit.is_completed_by(by_date.get(&day).copied()) {
                    streak += 1;
                } else {
                    break;
                }
            }
            match day.pred_opt() {
                Some(prev) => day = prev,
                None => break,
            }
        }
        streak
    }
}

/// [`StreakCalculator::current_streak`] with the default 1000-day horizon.
pub fn current_streak(habit: &Habit, entries: &[Entry], reference: NaiveDate) -> u32 {
    StreakCalculator::new().current_streak(habit, entries, reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{HabitDraft, UnitType};
    use crate::schedule::ScheduleMask;
    use chrono::{Datelike, Weekday};

    fn reference() -> NaiveDate {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn habit_with(schedule: ScheduleMask) -> Habit {
        let mut draft = HabitDraft::new("Stretch");
        draft.schedule = schedule;
        draft.into_habit(1, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap()
    }

    fn done_for(days_back: impl IntoIterator<Item = i64>) -> Vec<Entry> {
        days_back
            .into_iter()
            .map(|n| Entry::boolean(1, reference() - Duration::days(n), true))
            .collect()
    }

    #[test]
    fn empty_schedule_never_builds_a_streak() {
        let habit = habit_with(ScheduleMask(0));
        let entries = done_for(0..30);
        assert_eq!(current_streak(&habit, &entries, reference()), 0);
    }

    #[test]
    fn no_entries_means_no_streak() {
        let habit = habit_with(ScheduleMask::daily());
        assert_eq!(current_streak(&habit, &[], reference()), 0);
    }

    #[test]
    fn incomplete_reference_day_breaks_immediately() {
        let habit = habit_with(ScheduleMask::daily());
        let mut entries = done_for(1..=5);
        assert_eq!(current_streak(&habit, &entries, reference()), 0);

        entries.push(Entry::boolean(1, reference(), false));
        assert_eq!(current_streak(&habit, &entries, reference()), 0);
    }

    #[test]
    fn counts_until_first_gap() {
        let habit = habit_with(ScheduleMask::daily());
        // Reference day plus the 9 before it; day 10 back is missing.
        let mut entries = done_for(0..10);
        entries.extend(done_for(11..20));
        assert_eq!(current_streak(&habit, &entries, reference()), 10);
    }

    #[test]
    fn unscheduled_days_are_skipped() {
        let habit = habit_with(ScheduleMask::from_days([Weekday::Mon, Weekday::Wed, Weekday::Fri]));
        // Wed (ref), Mon (-2), Fri (-5) done; Wed (-7) missing.
        let entries = done_for([0, 2, 5]);
        assert_eq!(current_streak(&habit, &entries, reference()), 3);
    }

    #[test]
    fn count_habit_uses_target() {
        let mut draft = HabitDraft::new("Water");
        draft.unit_type = UnitType::Count;
        draft.target = Some(8);
        let habit = draft.into_habit(1, reference()).unwrap();
        let entries = vec![
            Entry::count(1, reference(), 8),
            Entry::count(1, reference() - Duration::days(1), 10),
            Entry::count(1, reference() - Duration::days(2), 7),
        ];
        assert_eq!(current_streak(&habit, &entries, reference()), 2);
    }

    #[test]
    fn horizon_bounds_a_perfect_history() {
        let habit = habit_with(ScheduleMask::daily());
        let entries = done_for(0..1500);
        // Reference day plus the 1000 days before it.
        assert_eq!(current_streak(&habit, &entries, reference()), 1001);
    }

    #[test]
    fn horizon_counts_only_scheduled_days_in_window() {
        let habit = habit_with(ScheduleMask::from_days([Weekday::Mon]));
        let entries = done_for(0..1500);
        let calc = StreakCalculator::new();
        let start = calc.window_start(reference());
        let mondays = (0..=1000)
            .map(|n| reference() - Duration::days(n))
            .filter(|d| d.weekday() == Weekday::Mon && *d >= start)
            .count() as u32;
        assert_eq!(calc.current_streak(&habit, &entries, reference()), mondays);
    }

    #[test]
    fn custom_horizon_is_respected() {
        let habit = habit_with(ScheduleMask::daily());
        let entries = done_for(0..100);
        let calc = StreakCalculator::with_config(StreakConfig { horizon_days: 7 });
        assert_eq!(calc.current_streak(&habit, &entries, reference()), 8);
    }

    #[test]
    fn oversized_horizon_clamps_to_earliest_date() {
        let calc = StreakCalculator::with_config(StreakConfig { horizon_days: u32::MAX });
        assert_eq!(calc.window_start(reference()), NaiveDate::MIN);

        let habit = habit_with(ScheduleMask::daily());
        let mut entries = done_for(0..3);
        assert_eq!(calc.current_streak(&habit, &entries, reference()), 3);
        entries.clear();
        assert_eq!(calc.current_streak(&habit, &entries, reference()), 0);
    }
}
