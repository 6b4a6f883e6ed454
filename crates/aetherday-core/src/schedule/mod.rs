//! Schedule types: day tasks, the Aether Sink backlog and the archive.

mod balance;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::energy::MAX_ENERGY;
use crate::error::ValidationError;

pub use balance::{auto_balance, BalancePlan};

/// Largest energy cost a single task may carry: one full bar.
pub const MAX_TASK_ENERGY_COST: i32 = MAX_ENERGY;

/// A task placed on a user's day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub energy_cost: i32,
    pub is_critical: bool,
    pub is_flexible: bool,
    pub is_locked: bool,
    pub is_completed: bool,
    pub scheduled_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ScheduledTask {
    /// Break tasks boost regeneration while they run.
    pub fn is_break(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case("break")
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start_time <= at && at < self.end_time
    }

    /// Flexible tasks that auto-balance may move.
    pub fn is_movable(&self) -> bool {
        self.is_flexible && !self.is_locked && !self.is_completed
    }
}

/// Request body for creating a scheduled task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduledTask {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub energy_cost: i32,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default = "default_true")]
    pub is_flexible: bool,
    #[serde(default)]
    pub is_locked: bool,
}

fn default_true() -> bool {
    true
}

impl NewScheduledTask {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "must not be empty".into(),
            });
        }
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.energy_cost < 0 {
            return Err(ValidationError::InvalidValue {
                field: "energyCost".into(),
                message: "must not be negative".into(),
            });
        }
        if self.energy_cost > MAX_TASK_ENERGY_COST {
            return Err(ValidationError::InvalidValue {
                field: "energyCost".into(),
                message: format!("must be at most {MAX_TASK_ENERGY_COST}"),
            });
        }
        Ok(())
    }

    pub fn into_task(self, user_id: &str, now: DateTime<Utc>) -> Result<ScheduledTask, ValidationError> {
        self.validate()?;
        Ok(ScheduledTask {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: self.name.trim().to_string(),
            scheduled_date: self.start_time.date_naive(),
            start_time: self.start_time,
            end_time: self.end_time,
            energy_cost: self.energy_cost,
            is_critical: self.is_critical,
            is_flexible: self.is_flexible,
            is_locked: self.is_locked,
            is_completed: false,
            created_at: now,
        })
    }
}

/// A task waiting in the Aether Sink to be placed on a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkTask {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub duration_minutes: i64,
    pub energy_cost: i32,
    pub is_critical: bool,
    pub created_at: DateTime<Utc>,
}

impl SinkTask {
    /// The sink row keeps the scheduled task's id.
    pub fn from_scheduled(task: &ScheduledTask, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id.clone(),
            user_id: task.user_id.clone(),
            name: task.name.clone(),
            duration_minutes: task.duration().num_minutes().max(1),
            energy_cost: task.energy_cost,
            is_critical: task.is_critical,
            created_at: now,
        }
    }

    /// Place this sink task on the day as a flexible task starting at `start`.
    pub fn schedule_at(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> ScheduledTask {
        ScheduledTask {
            id: Uuid::new_v4().to_string(),
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            start_time: start,
            end_time: start + Duration::minutes(self.duration_minutes.max(1)),
            energy_cost: self.energy_cost,
            is_critical: self.is_critical,
            is_flexible: true,
            is_locked: false,
            is_completed: false,
            scheduled_date: start.date_naive(),
            created_at: now,
        }
    }
}

/// Why a task left the schedule for the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetireReason {
    Completed,
    Discarded,
}

impl RetireReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetireReason::Completed => "completed",
            RetireReason::Discarded => "discarded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(RetireReason::Completed),
            "discarded" => Some(RetireReason::Discarded),
            _ => None,
        }
    }
}

/// An archived task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetiredTask {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub duration_minutes: i64,
    pub energy_cost: i32,
    pub is_critical: bool,
    pub is_completed: bool,
    pub reason: RetireReason,
    pub retired_at: DateTime<Utc>,
}

impl RetiredTask {
    pub fn from_scheduled(task: &ScheduledTask, reason: RetireReason, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id.clone(),
            user_id: task.user_id.clone(),
            name: task.name.clone(),
            duration_minutes: task.duration().num_minutes(),
            energy_cost: task.energy_cost,
            is_critical: task.is_critical,
            is_completed: task.is_completed,
            reason,
            retired_at: now,
        }
    }
}

/// Copy of a user's sink taken before an auto-balance, plus the day-side
/// rows that run touched so it can be undone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkSnapshot {
    pub id: String,
    pub user_id: String,
    pub taken_at: DateTime<Utc>,
    /// The sink as it was.
    pub tasks: Vec<SinkTask>,
    /// Day tasks the balance took off the schedule, as they were.
    #[serde(default)]
    pub removed_tasks: Vec<ScheduledTask>,
    /// Which of `removed_tasks` went back on the day; the rest were sunk.
    #[serde(default)]
    pub placed_ids: Vec<String>,
}
