use chrono::NaiveDate;
use habitroom_core::HabitId;

use super::{open_repository, print_json, today};

pub fn run(id: HabitId, date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;
    let date = date.unwrap_or_else(today);
    let streak = repo.streak_for_habit(id, date)?;
    print_json(&serde_json::json!({
        "habit_id": id,
        "date": date,
        "streak": streak,
    }))
}
