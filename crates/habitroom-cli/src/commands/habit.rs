use chrono::NaiveTime;
use clap::Subcommand;
use habitroom_core::{HabitDraft, HabitId, HabitMode, HabitPatch, ScheduleMask, UnitType};

use super::{now, open_repository, parse_time, print_json};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit title
        title: String,
        /// build or quit
        #[arg(long, default_value = "build")]
        mode: HabitMode,
        /// Track a daily count instead of done/not done
        #[arg(long)]
        count: bool,
        /// Daily target for count habits
        #[arg(long)]
        target: Option<i64>,
        /// Scheduled days: daily, weekdays, weekends or e.g. "mon,wed,fri"
        #[arg(long, default_value = "daily")]
        days: ScheduleMask,
        /// Reminder time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        reminder: Option<NaiveTime>,
        /// Display color
        #[arg(long, default_value_t = 0)]
        color: i64,
    },
    /// Edit an existing habit
    Edit {
        /// Habit ID
        id: HabitId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        mode: Option<HabitMode>,
        /// Switch to a count habit
        #[arg(long, conflicts_with = "boolean")]
        count: bool,
        /// Switch to a done/not done habit
        #[arg(long)]
        boolean: bool,
        #[arg(long)]
        target: Option<i64>,
        #[arg(long)]
        days: Option<ScheduleMask>,
        /// Reminder time (HH:MM)
        #[arg(long, value_parser = parse_time, conflicts_with = "no_reminder")]
        reminder: Option<NaiveTime>,
        /// Remove the reminder
        #[arg(long)]
        no_reminder: bool,
        #[arg(long)]
        color: Option<i64>,
    },
    /// List active habits, newest first
    List {
        /// List archived habits instead, by title
        #[arg(long)]
        archived: bool,
    },
    /// Show one habit
    Show {
        /// Habit ID
        id: HabitId,
    },
    /// Archive a habit and silence its reminders
    Archive {
        /// Habit ID
        id: HabitId,
    },
    /// Restore an archived habit
    Unarchive {
        /// Habit ID
        id: HabitId,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit ID
        id: HabitId,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut repo = open_repository()?;

    match action {
        HabitAction::Add {
            title,
            mode,
            count,
            target,
            days,
            reminder,
            color,
        } => {
            let draft = HabitDraft {
                mode,
                unit_type: if count { UnitType::Count } else { UnitType::Boolean },
                target,
                schedule: days,
                reminder_time: reminder,
                color,
                ..HabitDraft::new(title)
            };
            let habit = repo.create_habit(draft, now())?;
            print_json(&habit)?;
        }
        HabitAction::Edit {
            id,
            title,
            mode,
            count,
            boolean,
            target,
            days,
            reminder,
            no_reminder,
            color,
        } => {
            let unit_type = match (count, boolean) {
                (true, _) => Some(UnitType::Count),
                (_, true) => Some(UnitType::Boolean),
                _ => None,
            };
            let reminder_time = if no_reminder {
                Some(None)
            } else {
                reminder.map(Some)
            };
            let patch = HabitPatch {
                title,
                mode,
                unit_type,
                target: target.map(Some),
                schedule: days,
                reminder_time,
                color,
            };
            let habit = repo.update_habit(id, &patch, now())?;
            print_json(&habit)?;
        }
        HabitAction::List { archived } => {
            let habits = if archived {
                repo.archived_habits()?
            } else {
                repo.active_habits()?
            };
            print_json(&habits)?;
        }
        HabitAction::Show { id } => {
            let habit = repo.get_habit(id)?;
            print_json(&habit)?;
        }
        HabitAction::Archive { id } => {
            repo.archive_habit(id)?;
            println!("ok");
        }
        HabitAction::Unarchive { id } => {
            let habit = repo.unarchive_habit(id, now())?;
            print_json(&habit)?;
        }
        HabitAction::Delete { id } => {
            repo.delete_habit(id)?;
            println!("ok");
        }
    }
    Ok(())
}
