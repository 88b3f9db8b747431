//! Reminder time derivation.
//!
//! Count habits with a daily target above one get several reminders spread
//! over the day. The number and position of the anchors grow with the
//! target; the user's preferred time replaces the anchor nearest in hour.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

/// Fixed anchor times as (hour, minute) for each target tier.
fn anchors_for(target: u32) -> &'static [(u32, u32)] {
    match target {
        0..=2 => &[(9, 0), (19, 0)],
        3..=4 => &[(9, 0), (14, 0), (20, 0)],
        5..=6 => &[(9, 0), (12, 30), (16, 0), (20, 0)],
        _ => &[(8, 0), (11, 30), (15, 0), (18, 0), (21, 0)],
    }
}

/// Reminder times of day for a count habit with the given daily `target`.
///
/// When `preferred` is set it replaces the anchor whose hour is closest to
/// its hour; on a tie the earlier anchor is replaced. The result is sorted
/// ascending.
pub fn plan_reminder_times(target: u32, preferred: Option<NaiveTime>) -> Vec<NaiveTime> {
    let mut times: Vec<NaiveTime> = anchors_for(target)
        .iter()
        .filter_map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .collect();

    if let Some(preferred) = preferred {
        let closest = times
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.hour().abs_diff(preferred.hour()))
            .map(|(i, _)| i);
        if let Some(i) = closest {
            debug!(replaced = %times[i], with = %preferred, "preferred time replaces anchor");
            times[i] = preferred;
        }
    }

    times.sort();
    times
}

/// Next instant strictly after `now` that falls on `time` of day.
///
/// Today's occurrence is used only when it is later than `now`; an exact
/// match rolls over to tomorrow.
pub fn next_occurrence(time: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(time);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}
