//! SQLite storage for profiles, scheduled tasks and the Aether Sink.
//!
//! Row helpers take a plain `&Connection` so service code can run several of
//! them inside one transaction (`Transaction` derefs to `Connection`).

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use super::{data_dir, migrations};
use crate::error::{CoreError, DatabaseError, Result};
use crate::profile::Profile;
use crate::schedule::{RetireReason, RetiredTask, ScheduledTask, SinkSnapshot, SinkTask};

/// Fixed-width UTC timestamps so lexicographic order matches time order.
pub fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn conversion_error(idx: usize, err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn ts_at(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn opt_ts_at(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| conversion_error(idx, e)),
        None => Ok(None),
    }
}

fn opt_date_at(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| conversion_error(idx, e)),
        None => Ok(None),
    }
}

fn date_at(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_error(idx, e))
}

// === Profiles ===

const PROFILE_COLUMNS: &str = "id, energy, xp, level, last_energy_regen_at, tasks_completed_today,
    last_daily_reward_claim, daily_challenge_target, daily_challenge_reset_on,
    default_auto_schedule_start_time, default_auto_schedule_end_time, version,
    created_at, updated_at";

fn row_to_profile(row: &Row) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        energy: row.get(1)?,
        xp: row.get(2)?,
        level: row.get(3)?,
        last_energy_regen_at: ts_at(row, 4)?,
        tasks_completed_today: row.get(5)?,
        last_daily_reward_claim: opt_ts_at(row, 6)?,
        daily_challenge_target: row.get(7)?,
        daily_challenge_reset_on: opt_date_at(row, 8)?,
        default_auto_schedule_start_time: row.get(9)?,
        default_auto_schedule_end_time: row.get(10)?,
        version: row.get(11)?,
        created_at: ts_at(row, 12)?,
        updated_at: ts_at(row, 13)?,
    })
}

pub fn insert_profile(conn: &Connection, profile: &Profile) -> rusqlite::Result<()> {
    conn.execute(
        &format!("INSERT INTO profiles ({PROFILE_COLUMNS})
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"),
        params![
            profile.id,
            profile.energy,
            profile.xp,
            profile.level,
            fmt_ts(profile.last_energy_regen_at),
            profile.tasks_completed_today,
            profile.last_daily_reward_claim.map(fmt_ts),
            profile.daily_challenge_target,
            profile.daily_challenge_reset_on.map(fmt_date),
            profile.default_auto_schedule_start_time,
            profile.default_auto_schedule_end_time,
            profile.version,
            fmt_ts(profile.created_at),
            fmt_ts(profile.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_profile(conn: &Connection, id: &str) -> rusqlite::Result<Option<Profile>> {
    conn.query_row(
        &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
        params![id],
        row_to_profile,
    )
    .optional()
}

/// Write every mutable column of `profile` if the stored version still equals
/// `profile.version`. Returns `false` (and writes nothing) on a version
/// mismatch; on success the stored version is `profile.version + 1`.
pub fn update_profile_cas(conn: &Connection, profile: &Profile) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE profiles SET
            energy = ?1,
            xp = ?2,
            level = ?3,
            last_energy_regen_at = ?4,
            tasks_completed_today = ?5,
            last_daily_reward_claim = ?6,
            daily_challenge_target = ?7,
            daily_challenge_reset_on = ?8,
            default_auto_schedule_start_time = ?9,
            default_auto_schedule_end_time = ?10,
            updated_at = ?11,
            version = version + 1
         WHERE id = ?12 AND version = ?13",
        params![
            profile.energy,
            profile.xp,
            profile.level,
            fmt_ts(profile.last_energy_regen_at),
            profile.tasks_completed_today,
            profile.last_daily_reward_claim.map(fmt_ts),
            profile.daily_challenge_target,
            profile.daily_challenge_reset_on.map(fmt_date),
            profile.default_auto_schedule_start_time,
            profile.default_auto_schedule_end_time,
            fmt_ts(profile.updated_at),
            profile.id,
            profile.version,
        ],
    )?;
    Ok(changed == 1)
}

/// Profiles that can still regenerate.
pub fn list_profiles_below(conn: &Connection, max_energy: i32) -> rusqlite::Result<Vec<Profile>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE energy < ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![max_energy], row_to_profile)?;
    rows.collect()
}

// === Scheduled tasks ===

const TASK_COLUMNS: &str = "id, user_id, name, start_time, end_time, energy_cost, is_critical,
    is_flexible, is_locked, is_completed, scheduled_date, created_at";

fn row_to_task(row: &Row) -> rusqlite::Result<ScheduledTask> {
    Ok(ScheduledTask {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        start_time: ts_at(row, 3)?,
        end_time: ts_at(row, 4)?,
        energy_cost: row.get(5)?,
        is_critical: row.get(6)?,
        is_flexible: row.get(7)?,
        is_locked: row.get(8)?,
        is_completed: row.get(9)?,
        scheduled_date: date_at(row, 10)?,
        created_at: ts_at(row, 11)?,
    })
}

pub fn insert_task(conn: &Connection, task: &ScheduledTask) -> rusqlite::Result<()> {
    conn.execute(
        &format!("INSERT INTO scheduled_tasks ({TASK_COLUMNS})
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
        params![
            task.id,
            task.user_id,
            task.name,
            fmt_ts(task.start_time),
            fmt_ts(task.end_time),
            task.energy_cost,
            task.is_critical,
            task.is_flexible,
            task.is_locked,
            task.is_completed,
            fmt_date(task.scheduled_date),
            fmt_ts(task.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_task(conn: &Connection, id: &str) -> rusqlite::Result<Option<ScheduledTask>> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM scheduled_tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .optional()
}

pub fn mark_task_completed(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE scheduled_tasks SET is_completed = 1 WHERE id = ?1 AND is_completed = 0",
        params![id],
    )?;
    Ok(changed == 1)
}

pub fn delete_task(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM scheduled_tasks WHERE id = ?1", params![id])?;
    Ok(changed == 1)
}

pub fn list_tasks_on(conn: &Connection, user_id: &str, date: NaiveDate) -> rusqlite::Result<Vec<ScheduledTask>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM scheduled_tasks
         WHERE user_id = ?1 AND scheduled_date = ?2
         ORDER BY start_time"
    ))?;
    let rows = stmt.query_map(params![user_id, fmt_date(date)], row_to_task)?;
    rows.collect()
}

/// Tasks of `user_id` that overlap `[from, to)`.
pub fn list_tasks_overlapping(
    conn: &Connection,
    user_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> rusqlite::Result<Vec<ScheduledTask>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM scheduled_tasks
         WHERE user_id = ?1 AND start_time < ?3 AND end_time > ?2
         ORDER BY start_time"
    ))?;
    let rows = stmt.query_map(params![user_id, fmt_ts(from), fmt_ts(to)], row_to_task)?;
    rows.collect()
}

// === Aether Sink ===

const SINK_COLUMNS: &str = "id, user_id, name, duration_minutes, energy_cost, is_critical, created_at";

fn row_to_sink_task(row: &Row) -> rusqlite::Result<SinkTask> {
    Ok(SinkTask {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        duration_minutes: row.get(3)?,
        energy_cost: row.get(4)?,
        is_critical: row.get(5)?,
        created_at: ts_at(row, 6)?,
    })
}

pub fn insert_sink_task(conn: &Connection, task: &SinkTask) -> rusqlite::Result<()> {
    conn.execute(
        &format!("INSERT INTO aethersink ({SINK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        params![
            task.id,
            task.user_id,
            task.name,
            task.duration_minutes,
            task.energy_cost,
            task.is_critical,
            fmt_ts(task.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_sink_task(conn: &Connection, id: &str) -> rusqlite::Result<Option<SinkTask>> {
    conn.query_row(
        &format!("SELECT {SINK_COLUMNS} FROM aethersink WHERE id = ?1"),
        params![id],
        row_to_sink_task,
    )
    .optional()
}

pub fn delete_sink_task(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM aethersink WHERE id = ?1", params![id])?;
    Ok(changed == 1)
}

pub fn list_sink(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<SinkTask>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SINK_COLUMNS} FROM aethersink WHERE user_id = ?1
         ORDER BY is_critical DESC, created_at"
    ))?;
    let rows = stmt.query_map(params![user_id], row_to_sink_task)?;
    rows.collect()
}

pub fn insert_snapshot(conn: &Connection, snapshot: &SinkSnapshot) -> Result<()> {
    conn.execute(
        "INSERT INTO aethersink_snapshots
            (id, user_id, taken_at, tasks, removed_tasks, placed_ids)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            snapshot.id,
            snapshot.user_id,
            fmt_ts(snapshot.taken_at),
            serde_json::to_string(&snapshot.tasks)?,
            serde_json::to_string(&snapshot.removed_tasks)?,
            serde_json::to_string(&snapshot.placed_ids)?,
        ],
    )?;
    Ok(())
}

/// Most recent snapshot; rows sharing a timestamp resolve by insertion order.
pub fn latest_snapshot(conn: &Connection, user_id: &str) -> Result<Option<SinkSnapshot>> {
    let row = conn
        .query_row(
            "SELECT id, user_id, taken_at, tasks, removed_tasks, placed_ids
             FROM aethersink_snapshots
             WHERE user_id = ?1 ORDER BY taken_at DESC, rowid DESC LIMIT 1",
            params![user_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    ts_at(row, 2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, user_id, taken_at, tasks, removed, placed)) => Ok(Some(SinkSnapshot {
            id,
            user_id,
            taken_at,
            tasks: serde_json::from_str(&tasks)?,
            removed_tasks: serde_json::from_str(&removed)?,
            placed_ids: serde_json::from_str(&placed)?,
        })),
        None => Ok(None),
    }
}

pub fn delete_snapshot(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM aethersink_snapshots WHERE id = ?1", params![id])?;
    Ok(changed == 1)
}

// === Retired tasks ===

pub fn insert_retired(conn: &Connection, task: &RetiredTask) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO retired_tasks
            (id, user_id, name, duration_minutes, energy_cost, is_critical, is_completed, reason, retired_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            task.id,
            task.user_id,
            task.name,
            task.duration_minutes,
            task.energy_cost,
            task.is_critical,
            task.is_completed,
            task.reason.as_str(),
            fmt_ts(task.retired_at),
        ],
    )?;
    Ok(())
}

pub fn list_retired(conn: &Connection, user_id: &str) -> Result<Vec<RetiredTask>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, duration_minutes, energy_cost, is_critical, is_completed, reason, retired_at
         FROM retired_tasks WHERE user_id = ?1 ORDER BY retired_at DESC",
    )?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((
            RetiredTask {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                duration_minutes: row.get(3)?,
                energy_cost: row.get(4)?,
                is_critical: row.get(5)?,
                is_completed: row.get(6)?,
                reason: RetireReason::Discarded,
                retired_at: ts_at(row, 8)?,
            },
            row.get::<_, String>(7)?,
        ))
    })?;

    let mut retired = Vec::new();
    for row in rows {
        let (mut task, reason) = row?;
        task.reason = RetireReason::parse(&reason).ok_or(DatabaseError::CorruptValue {
            column: "reason",
            value: reason,
        })?;
        retired.push(task);
    }
    Ok(retired)
}

/// SQLite database handle.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/aetherday/aetherday.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("aetherday.db");
        Self::open_at(&path)
    }

    /// Open (and migrate) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Run `f` inside a transaction, committing on `Ok` and rolling back on `Err`.
    pub fn with_transaction<T>(&self, f: impl FnOnce(&Transaction) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Fetch a profile, creating a default one on first sight.
    pub fn ensure_profile(&self, user_id: &str, now: DateTime<Utc>) -> Result<Profile> {
        if let Some(profile) = get_profile(&self.conn, user_id)? {
            return Ok(profile);
        }
        let profile = Profile::new(user_id, now);
        self.conn.execute(
            "INSERT OR IGNORE INTO profiles (id, energy, last_energy_regen_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3, ?3)",
            params![profile.id, profile.energy, fmt_ts(now)],
        )?;
        get_profile(&self.conn, user_id)?.ok_or_else(|| CoreError::not_found("profile", user_id))
    }

    pub fn profile(&self, user_id: &str) -> Result<Profile> {
        get_profile(&self.conn, user_id)?.ok_or_else(|| CoreError::not_found("profile", user_id))
    }

    pub fn task(&self, task_id: &str) -> Result<ScheduledTask> {
        get_task(&self.conn, task_id)?.ok_or_else(|| CoreError::not_found("task", task_id))
    }

    pub fn add_task(&self, task: &ScheduledTask) -> Result<()> {
        insert_task(&self.conn, task)?;
        Ok(())
    }

    pub fn tasks_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<ScheduledTask>> {
        Ok(list_tasks_on(&self.conn, user_id, date)?)
    }

    pub fn sink(&self, user_id: &str) -> Result<Vec<SinkTask>> {
        Ok(list_sink(&self.conn, user_id)?)
    }

    pub fn retired(&self, user_id: &str) -> Result<Vec<RetiredTask>> {
        list_retired(&self.conn, user_id)
    }

    /// Set (or clear) the profile's workday window.
    pub fn set_workday_window(
        &self,
        user_id: &str,
        start: Option<&str>,
        end: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE profiles SET default_auto_schedule_start_time = ?1,
                default_auto_schedule_end_time = ?2, updated_at = ?3, version = version + 1
             WHERE id = ?4",
            params![start, end, fmt_ts(now), user_id],
        )?;
        if changed == 0 {
            return Err(CoreError::not_found("profile", user_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::NewScheduledTask;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn sample_task(user: &str, start: DateTime<Utc>, minutes: i64) -> ScheduledTask {
        NewScheduledTask {
            name: "Write".into(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            energy_cost: 5,
            is_critical: false,
            is_flexible: true,
            is_locked: false,
        }
        .into_task(user, now())
        .unwrap()
    }

    #[test]
    fn ensure_profile_is_idempotent() {
        let db = Database::open_memory().unwrap();
        let first = db.ensure_profile("u-1", now()).unwrap();
        let second = db.ensure_profile("u-1", now() + Duration::hours(1)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.energy, crate::energy::MAX_ENERGY);
    }

    #[test]
    fn cas_rejects_stale_version() {
        let db = Database::open_memory().unwrap();
        let mut profile = db.ensure_profile("u-1", now()).unwrap();
        profile.energy = 40;
        assert!(update_profile_cas(db.conn(), &profile).unwrap());

        // Same (now stale) version again.
        profile.energy = 10;
        assert!(!update_profile_cas(db.conn(), &profile).unwrap());

        let stored = db.profile("u-1").unwrap();
        assert_eq!(stored.energy, 40);
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn profile_round_trips_optional_fields() {
        let db = Database::open_memory().unwrap();
        let mut profile = db.ensure_profile("u-1", now()).unwrap();
        profile.last_daily_reward_claim = Some(now());
        profile.daily_challenge_reset_on = Some(now().date_naive());
        profile.default_auto_schedule_start_time = Some("09:00".into());
        assert!(update_profile_cas(db.conn(), &profile).unwrap());

        let stored = db.profile("u-1").unwrap();
        assert_eq!(stored.last_daily_reward_claim, Some(now()));
        assert_eq!(stored.daily_challenge_reset_on, Some(now().date_naive()));
        assert_eq!(stored.default_auto_schedule_start_time.as_deref(), Some("09:00"));
    }

    #[test]
    fn overlapping_lookup_uses_half_open_bounds() {
        let db = Database::open_memory().unwrap();
        db.ensure_profile("u-1", now()).unwrap();
        db.add_task(&sample_task("u-1", now(), 30)).unwrap();
        db.add_task(&sample_task("u-1", now() + Duration::hours(2), 30)).unwrap();
        db.add_task(&sample_task("u-2", now(), 30)).unwrap();

        let hits = list_tasks_overlapping(db.conn(), "u-1", now() + Duration::minutes(10), now() + Duration::hours(2))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(db.tasks_on("u-1", now().date_naive()).unwrap().len(), 2);
    }

    #[test]
    fn transaction_rolls_back_on_error() {
        let db = Database::open_memory().unwrap();
        db.ensure_profile("u-1", now()).unwrap();
        let task = sample_task("u-1", now(), 30);
        let result: Result<()> = db.with_transaction(|tx| {
            insert_task(tx, &task)?;
            Err(CoreError::Conflict("boom".into()))
        });
        assert!(result.is_err());
        assert!(get_task(db.conn(), &task.id).unwrap().is_none());
    }

    #[test]
    fn snapshot_round_trip() {
        let db = Database::open_memory().unwrap();
        db.ensure_profile("u-1", now()).unwrap();
        let sink = SinkTask::from_scheduled(&sample_task("u-1", now(), 45), now());
        insert_sink_task(db.conn(), &sink).unwrap();
        let snapshot = SinkSnapshot {
            id: "s-1".into(),
            user_id: "u-1".into(),
            taken_at: now(),
            tasks: db.sink("u-1").unwrap(),
            removed_tasks: vec![sample_task("u-1", now(), 20)],
            placed_ids: vec!["t-9".into()],
        };
        insert_snapshot(db.conn(), &snapshot).unwrap();
        let latest = latest_snapshot(db.conn(), "u-1").unwrap().unwrap();
        assert_eq!(latest.tasks, vec![sink]);
        assert_eq!(latest.removed_tasks, snapshot.removed_tasks);
        assert_eq!(latest.placed_ids, vec!["t-9".to_string()]);
    }

    #[test]
    fn latest_snapshot_breaks_timestamp_ties_by_insertion() {
        let db = Database::open_memory().unwrap();
        db.ensure_profile("u-1", now()).unwrap();
        for id in ["s-b", "s-a", "s-c"] {
            let snapshot = SinkSnapshot {
                id: id.into(),
                user_id: "u-1".into(),
                taken_at: now(),
                tasks: Vec::new(),
                removed_tasks: Vec::new(),
                placed_ids: Vec::new(),
            };
            insert_snapshot(db.conn(), &snapshot).unwrap();
        }
        assert_eq!(latest_snapshot(db.conn(), "u-1").unwrap().unwrap().id, "s-c");
    }
}
