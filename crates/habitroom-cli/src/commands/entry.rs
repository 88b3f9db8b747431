use chrono::NaiveDate;
use clap::Subcommand;
use habitroom_core::HabitId;

use super::{open_repository, print_json, today};

#[derive(Subcommand)]
pub enum EntryAction {
    /// Flip done/not done for a boolean habit
    Toggle {
        /// Habit ID
        id: HabitId,
        /// Day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Set the count for a count habit
    Set {
        /// Habit ID
        id: HabitId,
        /// New count
        value: u32,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Add to the count for a count habit
    Add {
        /// Habit ID
        id: HabitId,
        /// Amount to add, may be negative
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        by: i64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List entries of a habit
    List {
        /// Habit ID
        id: HabitId,
        /// First day of the range (inclusive)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Last day of the range (inclusive)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
    /// Remove the entry for a day
    Delete {
        /// Habit ID
        id: HabitId,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: EntryAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut repo = open_repository()?;

    match action {
        EntryAction::Toggle { id, date } => {
            let entry = repo.toggle_boolean(id, date.unwrap_or_else(today))?;
            print_json(&entry)?;
        }
        EntryAction::Set { id, value, date } => {
            let entry = repo.set_count(id, date.unwrap_or_else(today), value)?;
            print_json(&entry)?;
        }
        EntryAction::Add { id, by, date } => {
            let entry = repo.increment_count(id, date.unwrap_or_else(today), by)?;
            print_json(&entry)?;
        }
        EntryAction::List { id, from, to } => {
            let entries = match (from, to) {
                (Some(from), Some(to)) => repo.entries_in_range(id, from, to)?,
                _ => repo.entries_for_habit(id)?,
            };
            print_json(&entries)?;
        }
        EntryAction::Delete { id, date } => {
            let removed = repo.delete_entry(id, date.unwrap_or_else(today))?;
            println!("{}", if removed { "ok" } else { "no entry" });
        }
    }
    Ok(())
}
