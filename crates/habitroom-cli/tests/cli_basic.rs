//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_habitroom-cli"))
        .args(args)
        .env("HABITROOM_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command, expect success and parse stdout as JSON.
fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn data_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn test_habit_add_and_list() {
    let dir = data_dir();
    let habit = run_json(dir.path(), &["habit", "add", "  Read  ", "--days", "weekdays"]);
    assert_eq!(habit["title"], "Read");
    assert_eq!(habit["schedule"], 31);
    assert_eq!(habit["unit_type"], "boolean");

    let list = run_json(dir.path(), &["habit", "list"]);
    let habits = list.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["id"], habit["id"]);
}

#[test]
fn test_habit_add_rejects_blank_title() {
    let dir = data_dir();
    let (_, stderr, code) = run_cli(dir.path(), &["habit", "add", "   "]);
    assert_ne!(code, 0);
    assert!(stderr.starts_with("error:"), "unexpected stderr: {stderr}");
}

#[test]
fn test_archive_and_unarchive() {
    let dir = data_dir();
    let habit = run_json(dir.path(), &["habit", "add", "Stretch"]);
    let id = habit["id"].to_string();

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "archive", &id]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");
    assert_eq!(run_json(dir.path(), &["habit", "list"]).as_array().unwrap().len(), 0);
    assert_eq!(
        run_json(dir.path(), &["habit", "list", "--archived"]).as_array().unwrap().len(),
        1
    );

    let restored = run_json(dir.path(), &["habit", "unarchive", &id]);
    assert_eq!(restored["archived"], false);
}

#[test]
fn test_entry_toggle_and_streak() {
    let dir = data_dir();
    let habit = run_json(dir.path(), &["habit", "add", "Meditate"]);
    let id = habit["id"].to_string();

    for date in ["2024-06-10", "2024-06-11", "2024-06-12"] {
        let entry = run_json(dir.path(), &["entry", "toggle", &id, "--date", date]);
        assert_eq!(entry["value_bool"], true);
    }

    let streak = run_json(dir.path(), &["streak", &id, "--date", "2024-06-12"]);
    assert_eq!(streak["streak"], 3);

    let entry = run_json(dir.path(), &["entry", "toggle", &id, "--date", "2024-06-12"]);
    assert_eq!(entry["value_bool"], false);
    let streak = run_json(dir.path(), &["streak", &id, "--date", "2024-06-12"]);
    assert_eq!(streak["streak"], 0);
}

#[test]
fn test_count_entries() {
    let dir = data_dir();
    let habit = run_json(dir.path(), &["habit", "add", "Water", "--count", "--target", "3"]);
    let id = habit["id"].to_string();

    run_json(dir.path(), &["entry", "set", &id, "2", "--date", "2024-06-12"]);
    let entry = run_json(dir.path(), &["entry", "add", &id, "--date", "2024-06-12"]);
    assert_eq!(entry["value_count"], 3);
    let entry = run_json(dir.path(), &["entry", "add", &id, "--by", "-5", "--date", "2024-06-12"]);
    assert_eq!(entry["value_count"], 0);

    let (_, _, code) = run_cli(dir.path(), &["entry", "toggle", &id]);
    assert_ne!(code, 0, "toggling a count habit must fail");

    let entries = run_json(
        dir.path(),
        &["entry", "list", &id, "--from", "2024-06-01", "--to", "2024-06-30"],
    );
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn test_today_lists_scheduled_habits() {
    let dir = data_dir();
    run_json(dir.path(), &["habit", "add", "Gym", "--days", "mon,wed,fri"]);
    run_json(dir.path(), &["habit", "add", "Hike", "--days", "weekends"]);

    // 2024-06-12 is a Wednesday
    let today = run_json(dir.path(), &["today", "--date", "2024-06-12"]);
    let habits = today.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["habit"]["title"], "Gym");
    assert_eq!(habits[0]["completed"], false);
    assert_eq!(habits[0]["streak"], 0);
}

#[test]
fn test_reminder_plan() {
    let dir = data_dir();
    let times = run_json(dir.path(), &["reminder", "plan", "--target", "5", "--at", "13:00"]);
    assert_eq!(
        times,
        serde_json::json!(["09:00", "13:00", "16:00", "20:00"])
    );
}

#[test]
fn test_smart_reminders_are_queued() {
    let dir = data_dir();
    let habit = run_json(
        dir.path(),
        &["habit", "add", "Water", "--count", "--target", "8", "--reminder", "09:00"],
    );

    let pending = run_json(dir.path(), &["reminder", "list"]);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 5);
    assert!(pending.iter().all(|r| r["habit_id"] == habit["id"]));

    let (_, _, code) = run_cli(dir.path(), &["habit", "delete", &habit["id"].to_string()]);
    assert_eq!(code, 0);
    assert!(run_json(dir.path(), &["reminder", "list"]).as_array().unwrap().is_empty());
}

#[test]
fn test_config_get_set() {
    let dir = data_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "reminders.smart"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "reminders.smart", "false"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "reminders.smart"]);
    assert_eq!(stdout.trim(), "false");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "reminders.volume"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("reminders.volume"));
}

#[test]
fn test_config_set_echoes_and_validates() {
    let dir = data_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "streak.horizon_days", "365"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "streak.horizon_days = 365");

    let (_, stderr, code) =
        run_cli(dir.path(), &["config", "set", "streak.horizon_days", "100000000"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("streak.horizon_days"));

    // The rejected value was not saved, so streaks still work.
    let habit = run_json(dir.path(), &["habit", "add", "Read"]);
    let streak = run_json(dir.path(), &["streak", &habit["id"].to_string()]);
    assert_eq!(streak["streak"], 0);
}

#[test]
fn test_config_path_points_into_data_dir() {
    let dir = data_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert_eq!(Path::new(stdout.trim()), dir.path().join("config.toml"));
}
