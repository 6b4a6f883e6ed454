//! Auto-balance: re-pack a day's flexible tasks around its fixed ones.
//!
//! Locked, inflexible and completed tasks stay put and act as obstacles.
//! Every movable task is lifted off the day and placed first-fit into the
//! free gaps of the workday (critical tasks first, then by their original
//! start). Anything that no longer fits goes to the Aether Sink.

use chrono::{DateTime, Duration, DurationRound, NaiveDate, Utc};
use serde::Serialize;

use super::{ScheduledTask, SinkTask};
use crate::energy::WorkdayWindow;

/// Rows an auto-balance run rewrites.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePlan {
    /// Ids of the movable tasks removed from the day.
    pub removed_ids: Vec<String>,
    /// Movable tasks re-inserted with new times.
    pub placed: Vec<ScheduledTask>,
    /// Movable tasks that did not fit and go to the sink.
    pub sunk: Vec<SinkTask>,
}

#[derive(Debug, Clone, Copy)]
struct Gap {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Gap {
    fn fits(&self, length: Duration) -> bool {
        self.end - self.start >= length
    }
}

/// Free intervals of `[from, until)` not covered by any of `fixed`.
fn free_gaps(fixed: &[&ScheduledTask], from: DateTime<Utc>, until: DateTime<Utc>) -> Vec<Gap> {
    let mut sorted: Vec<&&ScheduledTask> = fixed.iter().collect();
    sorted.sort_by_key(|t| t.start_time);

    let mut gaps = Vec::new();
    let mut last_end = from;
    for task in sorted {
        if task.end_time <= last_end {
            continue;
        }
        if task.start_time >= until {
            break;
        }
        if task.start_time > last_end {
            gaps.push(Gap {
                start: last_end,
                end: task.start_time.min(until),
            });
        }
        last_end = task.end_time.min(until);
    }
    if last_end < until {
        gaps.push(Gap {
            start: last_end,
            end: until,
        });
    }
    gaps
}

/// Plan a rebalance of `tasks` (one user's tasks for `day`).
///
/// Nothing is placed before `now`, rounded up to the next whole minute.
pub fn auto_balance(
    tasks: &[ScheduledTask],
    window: &WorkdayWindow,
    day: NaiveDate,
    now: DateTime<Utc>,
) -> BalancePlan {
    let (day_start, day_end) = window.bounds_on(day);
    let now_minute = now
        .duration_trunc(Duration::minutes(1))
        .map(|t| if t < now { t + Duration::minutes(1) } else { t })
        .unwrap_or(now);
    let floor = day_start.max(now_minute);

    let fixed: Vec<&ScheduledTask> = tasks.iter().filter(|t| !t.is_movable()).collect();
    let mut movable: Vec<&ScheduledTask> = tasks.iter().filter(|t| t.is_movable()).collect();
    movable.sort_by(|a, b| {
        b.is_critical
            .cmp(&a.is_critical)
            .then(a.start_time.cmp(&b.start_time))
    });

    let mut gaps = if floor < day_end {
        free_gaps(&fixed, floor, day_end)
    } else {
        Vec::new()
    };

    let mut plan = BalancePlan::default();
    for task in movable {
        plan.removed_ids.push(task.id.clone());
        let length = task.duration();
        match gaps.iter_mut().find(|g| g.fits(length)) {
            Some(gap) => {
                let mut placed = task.clone();
                placed.start_time = gap.start;
                placed.end_time = gap.start + length;
                placed.scheduled_date = placed.start_time.date_naive();
                gap.start = placed.end_time;
                plan.placed.push(placed);
            }
            None => plan.sunk.push(SinkTask::from_scheduled(task, now)),
        }
    }
    plan
}
