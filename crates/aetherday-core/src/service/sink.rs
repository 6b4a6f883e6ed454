//! Aether Sink moves, retirement and auto-balance.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::schedule::{auto_balance, RetireReason, RetiredTask, ScheduledTask, SinkSnapshot, SinkTask};
use crate::storage::database::{
    delete_sink_task, delete_snapshot, delete_task, get_sink_task, get_task, insert_retired,
    insert_sink_task, insert_snapshot, insert_task, latest_snapshot, list_sink, list_tasks_on,
};
use crate::storage::Database;

fn owned_task(conn: &rusqlite::Connection, user_id: &str, task_id: &str) -> Result<ScheduledTask> {
    get_task(conn, task_id)?
        .filter(|t| t.user_id == user_id)
        .ok_or_else(|| CoreError::not_found("task", task_id))
}

/// Move a scheduled task off the day into the sink.
pub fn send_to_sink(db: &Database, user_id: &str, task_id: &str, now: DateTime<Utc>) -> Result<SinkTask> {
    let sunk = db.with_transaction(|tx| {
        let task = owned_task(tx, user_id, task_id)?;
        if task.is_locked {
            return Err(CoreError::Conflict(format!("task {task_id} is locked")));
        }
        if task.is_completed {
            return Err(CoreError::Conflict(format!("task {task_id} is already completed")));
        }
        let sunk = SinkTask::from_scheduled(&task, now);
        delete_task(tx, task_id)?;
        insert_sink_task(tx, &sunk)?;
        Ok(sunk)
    })?;
    info!(user_id, task_id, sink_id = %sunk.id, "task sent to sink");
    Ok(sunk)
}

/// Place a sink task back on the day at `start`.
pub fn schedule_from_sink(
    db: &Database,
    user_id: &str,
    sink_id: &str,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<ScheduledTask> {
    let task = db.with_transaction(|tx| {
        let sunk = get_sink_task(tx, sink_id)?
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| CoreError::not_found("sink task", sink_id))?;
        let task = sunk.schedule_at(start, now);
        delete_sink_task(tx, sink_id)?;
        insert_task(tx, &task)?;
        Ok(task)
    })?;
    info!(user_id, sink_id, task_id = %task.id, "sink task scheduled");
    Ok(task)
}

/// Archive a scheduled task. Completed tasks retire as `completed`, the rest
/// as `discarded`.
pub fn retire_task(db: &Database, user_id: &str, task_id: &str, now: DateTime<Utc>) -> Result<RetiredTask> {
    let retired = db.with_transaction(|tx| {
        let task = owned_task(tx, user_id, task_id)?;
        let reason = if task.is_completed {
            RetireReason::Completed
        } else {
            RetireReason::Discarded
        };
        let retired = RetiredTask::from_scheduled(&task, reason, now);
        delete_task(tx, task_id)?;
        insert_retired(tx, &retired)?;
        Ok(retired)
    })?;
    info!(user_id, task_id, reason = retired.reason.as_str(), "task retired");
    Ok(retired)
}

/// What an auto-balance run changed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub placed: Vec<ScheduledTask>,
    pub sunk: Vec<SinkTask>,
    /// Sink snapshot taken before the rewrite.
    pub snapshot_id: String,
}

/// Re-pack `day`'s flexible tasks into the workday window.
///
/// The sink is snapshotted first; the whole rewrite is one transaction.
pub fn auto_balance_day(db: &Database, user_id: &str, day: NaiveDate, now: DateTime<Utc>) -> Result<BalanceReport> {
    let profile = db.ensure_profile(user_id, now)?;
    let window = profile.workday_window();

    let report = db.with_transaction(|tx| {
        let tasks = list_tasks_on(tx, user_id, day)?;
        let plan = auto_balance(&tasks, &window, day, now);

        let snapshot = SinkSnapshot {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            taken_at: now,
            tasks: list_sink(tx, user_id)?,
            removed_tasks: tasks
                .iter()
                .filter(|t| plan.removed_ids.contains(&t.id))
                .cloned()
                .collect(),
            placed_ids: plan.placed.iter().map(|t| t.id.clone()).collect(),
        };
        insert_snapshot(tx, &snapshot)?;

        for id in &plan.removed_ids {
            delete_task(tx, id)?;
        }
        for task in &plan.placed {
            insert_task(tx, task)?;
        }
        for task in &plan.sunk {
            insert_sink_task(tx, task)?;
        }
        Ok(BalanceReport {
            placed: plan.placed,
            sunk: plan.sunk,
            snapshot_id: snapshot.id,
        })
    })?;

    info!(
        user_id,
        %day,
        placed = report.placed.len(),
        sunk = report.sunk.len(),
        "day auto-balanced"
    );
    Ok(report)
}

/// Undo the most recent auto-balance.
///
/// Tasks the balance moved go back to their old slots unless completed
/// since. Tasks it sank leave the sink and return to the day, provided they
/// are still in the sink. Snapshotted sink rows that are missing are put
/// back; sink rows added after the balance stay. The snapshot is consumed.
pub fn restore_sink_snapshot(db: &Database, user_id: &str) -> Result<SinkSnapshot> {
    let snapshot = db.with_transaction(|tx| {
        let snapshot =
            latest_snapshot(tx, user_id)?.ok_or_else(|| CoreError::not_found("sink snapshot", user_id))?;

        for original in &snapshot.removed_tasks {
            let restorable = if snapshot.placed_ids.contains(&original.id) {
                get_task(tx, &original.id)?.is_some_and(|t| !t.is_completed) && delete_task(tx, &original.id)?
            } else {
                delete_sink_task(tx, &original.id)?
            };
            if restorable {
                insert_task(tx, original)?;
            }
        }
        for task in &snapshot.tasks {
            if get_sink_task(tx, &task.id)?.is_none() {
                insert_sink_task(tx, task)?;
            }
        }
        delete_snapshot(tx, &snapshot.id)?;
        Ok(snapshot)
    })?;
    info!(
        user_id,
        snapshot_id = %snapshot.id,
        tasks = snapshot.tasks.len(),
        returned = snapshot.removed_tasks.len(),
        "auto-balance undone"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::NewScheduledTask;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    fn add(db: &Database, name: &str, start: DateTime<Utc>, minutes: i64, locked: bool) -> ScheduledTask {
        let input = NewScheduledTask {
            name: name.into(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            energy_cost: 5,
            is_critical: false,
            is_flexible: true,
            is_locked: locked,
        };
        super::super::create_task(db, "u-1", input, at(7, 0)).unwrap()
    }

    #[test]
    fn sink_round_trip_keeps_duration() {
        let db = Database::open_memory().unwrap();
        let task = add(&db, "Read", at(9, 0), 40, false);
        let sunk = send_to_sink(&db, "u-1", &task.id, at(8, 0)).unwrap();
        assert_eq!(sunk.duration_minutes, 40);
        assert!(db.tasks_on("u-1", at(9, 0).date_naive()).unwrap().is_empty());

        let placed = schedule_from_sink(&db, "u-1", &sunk.id, at(15, 0), at(8, 0)).unwrap();
        assert_eq!(placed.end_time, at(15, 40));
        assert!(db.sink("u-1").unwrap().is_empty());
    }

    #[test]
    fn locked_task_cannot_be_sunk() {
        let db = Database::open_memory().unwrap();
        let task = add(&db, "Meeting", at(9, 0), 60, true);
        let err = send_to_sink(&db, "u-1", &task.id, at(8, 0)).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert!(db.task(&task.id).is_ok());
    }

    #[test]
    fn retire_archives_with_reason() {
        let db = Database::open_memory().unwrap();
        let task = add(&db, "Old", at(9, 0), 30, false);
        let retired = retire_task(&db, "u-1", &task.id, at(10, 0)).unwrap();
        assert_eq!(retired.reason, RetireReason::Discarded);
        assert_eq!(db.retired("u-1").unwrap(), vec![retired]);
        assert!(db.task(&task.id).is_err());
    }

    #[test]
    fn balance_packs_around_locked_task_and_snapshots() {
        let db = Database::open_memory().unwrap();
        add(&db, "Standup", at(9, 0), 60, true);
        add(&db, "Write", at(14, 0), 30, false);

        let report = auto_balance_day(&db, "u-1", at(9, 0).date_naive(), at(8, 0)).unwrap();
        assert_eq!(report.placed.len(), 1);
        assert_eq!(report.placed[0].start_time, at(8, 0));

        let day = db.tasks_on("u-1", at(9, 0).date_naive()).unwrap();
        assert_eq!(day.len(), 2);

        let snapshot = restore_sink_snapshot(&db, "u-1").unwrap();
        assert_eq!(snapshot.id, report.snapshot_id);
        let write = db.task(&report.placed[0].id).unwrap();
        assert_eq!(write.start_time, at(14, 0));
    }

    #[test]
    fn undoing_a_balance_brings_sunk_tasks_back() {
        let db = Database::open_memory().unwrap();
        let task = add(&db, "Write", at(14, 0), 30, false);
        let day = at(9, 0).date_naive();

        let report = auto_balance_day(&db, "u-1", day, at(23, 0)).unwrap();
        assert_eq!(report.sunk.len(), 1);
        assert!(db.tasks_on("u-1", day).unwrap().is_empty());
        assert_eq!(db.sink("u-1").unwrap().len(), 1);

        restore_sink_snapshot(&db, "u-1").unwrap();
        assert!(db.sink("u-1").unwrap().is_empty());
        assert_eq!(db.tasks_on("u-1", day).unwrap(), vec![task]);

        assert!(matches!(
            restore_sink_snapshot(&db, "u-1"),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn undo_keeps_work_done_after_the_balance() {
        let db = Database::open_memory().unwrap();
        let early = add(&db, "Early", at(10, 0), 30, false);
        let late = add(&db, "Late", at(11, 0), 30, false);
        let day = at(9, 0).date_naive();

        auto_balance_day(&db, "u-1", day, at(8, 0)).unwrap();
        super::super::complete_task(&db, "u-1", &early.id, at(8, 5)).unwrap();
        let sunk = send_to_sink(&db, "u-1", &late.id, at(8, 10)).unwrap();

        restore_sink_snapshot(&db, "u-1").unwrap();
        let kept = db.task(&early.id).unwrap();
        assert!(kept.is_completed);
        assert_eq!(kept.start_time, at(8, 0));
        assert_eq!(db.sink("u-1").unwrap(), vec![sunk]);
        assert!(db.task(&late.id).is_err());
    }

    #[test]
    fn restore_without_snapshot_is_not_found() {
        let db = Database::open_memory().unwrap();
        db.ensure_profile("u-1", at(8, 0)).unwrap();
        assert!(matches!(
            restore_sink_snapshot(&db, "u-1"),
            Err(CoreError::NotFound { .. })
        ));
    }
}
