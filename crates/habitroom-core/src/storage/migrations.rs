//! Database schema migrations for habitroom.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{debug, warn};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    debug!(version, "schema version updated");
    Ok(())
}

/// Migration v1: habits and their daily entries.
///
/// Entries are unique per (habit, date) and go away with their habit.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            title         TEXT NOT NULL,
            mode          TEXT NOT NULL DEFAULT 'build',
            unit_type     TEXT NOT NULL DEFAULT 'boolean',
            target        INTEGER,
            schedule      INTEGER NOT NULL DEFAULT 127,
            reminder_time TEXT,
            color         INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL,
            archived      INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS entries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id    INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
            local_date  TEXT NOT NULL,
            value_bool  INTEGER,
            value_count INTEGER,
            UNIQUE (habit_id, local_date)
        );

        CREATE INDEX IF NOT EXISTS idx_entries_habit_id ON entries(habit_id);
        CREATE INDEX IF NOT EXISTS idx_entries_local_date ON entries(local_date);
        CREATE INDEX IF NOT EXISTS idx_habits_archived ON habits(archived);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: pending reminder triggers, one row per (habit, slot).
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS reminders (
            habit_id    INTEGER NOT NULL,
            slot        INTEGER NOT NULL,
            habit_title TEXT NOT NULL,
            time_of_day TEXT NOT NULL,
            trigger_at  TEXT NOT NULL,
            PRIMARY KEY (habit_id, slot)
        );

        CREATE INDEX IF NOT EXISTS idx_reminders_trigger_at ON reminders(trigger_at);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()
}
