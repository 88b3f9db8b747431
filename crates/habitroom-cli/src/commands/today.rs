use chrono::NaiveDate;

use super::{open_repository, print_json, today};

pub fn run(date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;
    let habits = repo.habits_for_day(date.unwrap_or_else(today))?;
    print_json(&habits)
}
