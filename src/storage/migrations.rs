//! Database migrations for sleeplog.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;
use tracing::info;

use crate::error::SleeplogError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, SleeplogError> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| SleeplogError::Database(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), SleeplogError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| SleeplogError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), SleeplogError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        info!(version, "applying schema migration");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), SleeplogError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(SleeplogError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: Initial schema.
///
/// Creates tables for:
/// - `sleep_sessions`: completed sleeps and naps (duration is never stored)
/// - `tracker_state`: the single open-sleep slot
fn migrate_v1(conn: &Connection) -> Result<(), SleeplogError> {
    conn.execute_batch(
        r"
        -- Completed sleep sessions
        CREATE TABLE IF NOT EXISTS sleep_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            is_nap INTEGER NOT NULL DEFAULT 0,
            CHECK (end_time > start_time)
        );

        CREATE INDEX IF NOT EXISTS idx_sleep_sessions_end
        ON sleep_sessions(end_time);

        -- Open sleep, at most one row
        CREATE TABLE IF NOT EXISTS tracker_state (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            sleep_start TEXT
        );
        ",
    )
    .map_err(|e| SleeplogError::Database(format!("Migration v1 failed: {e}")))
}
