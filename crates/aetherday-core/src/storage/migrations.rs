//! Database schema migrations for aetherday.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 3;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
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

/// Returns 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> SqliteResult<i32> {
    match conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    }) {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: profiles, the day schedule, the Aether Sink and the archive.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS profiles (
            id                               TEXT PRIMARY KEY,
            energy                           INTEGER NOT NULL,
            xp                               INTEGER NOT NULL DEFAULT 0,
            level                            INTEGER NOT NULL DEFAULT 1,
            last_energy_regen_at             TEXT NOT NULL,
            tasks_completed_today            INTEGER NOT NULL DEFAULT 0,
            last_daily_reward_claim          TEXT,
            daily_challenge_target           INTEGER NOT NULL DEFAULT 3,
            daily_challenge_reset_on         TEXT,
            default_auto_schedule_start_time TEXT,
            default_auto_schedule_end_time   TEXT,
            version                          INTEGER NOT NULL DEFAULT 0,
            created_at                       TEXT NOT NULL,
            updated_at                       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS scheduled_tasks (
            id             TEXT PRIMARY KEY,
            user_id        TEXT NOT NULL REFERENCES profiles(id),
            name           TEXT NOT NULL,
            start_time     TEXT NOT NULL,
            end_time       TEXT NOT NULL,
            energy_cost    INTEGER NOT NULL DEFAULT 0,
            is_critical    INTEGER NOT NULL DEFAULT 0,
            is_flexible    INTEGER NOT NULL DEFAULT 1,
            is_locked      INTEGER NOT NULL DEFAULT 0,
            is_completed   INTEGER NOT NULL DEFAULT 0,
            scheduled_date TEXT NOT NULL,
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS aethersink (
            id               TEXT PRIMARY KEY,
            user_id          TEXT NOT NULL REFERENCES profiles(id),
            name             TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            energy_cost      INTEGER NOT NULL DEFAULT 0,
            is_critical      INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS aethersink_snapshots (
            id       TEXT PRIMARY KEY,
            user_id  TEXT NOT NULL REFERENCES profiles(id),
            taken_at TEXT NOT NULL,
            tasks    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS retired_tasks (
            id               TEXT PRIMARY KEY,
            user_id          TEXT NOT NULL REFERENCES profiles(id),
            name             TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            energy_cost      INTEGER NOT NULL DEFAULT 0,
            is_critical      INTEGER NOT NULL DEFAULT 0,
            is_completed     INTEGER NOT NULL DEFAULT 0,
            reason           TEXT NOT NULL,
            retired_at       TEXT NOT NULL
        );",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: indexes for the per-day and per-interval task lookups.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_scheduled_tasks_user_date
            ON scheduled_tasks(user_id, scheduled_date);
         CREATE INDEX IF NOT EXISTS idx_scheduled_tasks_user_start
            ON scheduled_tasks(user_id, start_time);
         CREATE INDEX IF NOT EXISTS idx_aethersink_user ON aethersink(user_id);
         CREATE INDEX IF NOT EXISTS idx_snapshots_user_taken
            ON aethersink_snapshots(user_id, taken_at);
         CREATE INDEX IF NOT EXISTS idx_profiles_energy ON profiles(energy);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: snapshots also record the day-side rows auto-balance touched.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "ALTER TABLE aethersink_snapshots ADD COLUMN removed_tasks TEXT NOT NULL DEFAULT '[]';
         ALTER TABLE aethersink_snapshots ADD COLUMN placed_ids TEXT NOT NULL DEFAULT '[]';",
    )?;
    set_schema_version(&tx, 3)?;
    tx.commit()
}
