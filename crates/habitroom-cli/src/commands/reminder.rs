use chrono::NaiveTime;
use clap::Subcommand;
use habitroom_core::{plan_reminder_times, ReminderQueue};

use super::{now, parse_time, print_json};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Preview the reminder times for a daily target
    Plan {
        /// Daily target count
        #[arg(long)]
        target: u32,
        /// Preferred reminder time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        at: Option<NaiveTime>,
    },
    /// List armed reminders by trigger time
    List,
    /// Fire every reminder that is due and re-arm it for the next day
    Due,
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReminderAction::Plan { target, at } => {
            let times: Vec<String> = plan_reminder_times(target, at)
                .iter()
                .map(|t| t.format("%H:%M").to_string())
                .collect();
            print_json(&times)?;
        }
        ReminderAction::List => {
            let queue = ReminderQueue::open()?;
            print_json(&queue.pending()?)?;
        }
        ReminderAction::Due => {
            let mut queue = ReminderQueue::open()?;
            let fired = queue.fire_due(now())?;
            print_json(&fired)?;
        }
    }
    Ok(())
}
