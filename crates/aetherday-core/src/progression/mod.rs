//! XP, levels and the daily challenge.
//!
//! Completing tasks costs energy and earns XP. Every [`XP_PER_LEVEL`] XP is
//! a level, and the level sets how many tasks the daily challenge asks for.
//! Finishing the challenge unlocks a once-per-day reward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::energy::MAX_ENERGY;
use crate::error::{CoreError, Result};
use crate::profile::Profile;
use crate::schedule::ScheduledTask;

pub const XP_PER_LEVEL: i64 = 100;
pub const BASE_TARGET: i32 = 3;
pub const DIFFICULTY_INCREASE_LEVEL_INTERVAL: i32 = 5;
pub const XP_PER_ENERGY_POINT: i64 = 2;
pub const CRITICAL_TASK_XP_BONUS: i64 = 10;
pub const DAILY_REWARD_XP: i64 = 50;
pub const DAILY_REWARD_ENERGY: i32 = 25;

/// Level for a total XP amount. Level 1 starts at 0 XP.
pub fn level_for_xp(xp: i64) -> i32 {
    (xp.max(0) / XP_PER_LEVEL + 1) as i32
}

/// Daily challenge target for a level: one more task every five levels.
pub fn calculate_target(level: i32) -> i32 {
    BASE_TARGET + (level.max(1) - 1) / DIFFICULTY_INCREASE_LEVEL_INTERVAL
}

pub fn xp_for_task(task: &ScheduledTask) -> i64 {
    let base = i64::from(task.energy_cost.max(1)) * XP_PER_ENERGY_POINT;
    if task.is_critical {
        base + CRITICAL_TASK_XP_BONUS
    } else {
        base
    }
}

/// What a daily challenge refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRefresh {
    pub reset: bool,
    pub target: i32,
    pub tasks_completed_today: i32,
}

/// Start a new daily challenge if this UTC day has not had one yet.
///
/// Leaves the profile untouched when the reward was already claimed today
/// or the challenge was already reset today.
pub fn refresh_daily_challenge(profile: &mut Profile, now: DateTime<Utc>) -> ChallengeRefresh {
    let today = now.date_naive();
    let already_reset = profile.daily_challenge_reset_on == Some(today);
    if profile.claimed_on(now) || already_reset {
        return ChallengeRefresh {
            reset: false,
            target: profile.daily_challenge_target,
            tasks_completed_today: profile.tasks_completed_today,
        };
    }

    profile.daily_challenge_target = calculate_target(profile.level);
    profile.tasks_completed_today = 0;
    profile.daily_challenge_reset_on = Some(today);
    profile.updated_at = now;

    ChallengeRefresh {
        reset: true,
        target: profile.daily_challenge_target,
        tasks_completed_today: 0,
    }
}

/// Energy and XP movement from completing one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub energy: i32,
    pub energy_spent: i32,
    pub xp: i64,
    pub xp_gained: i64,
    pub level: i32,
    pub leveled_up: bool,
    pub tasks_completed_today: i32,
}

/// Debit the task's energy cost and credit its XP.
///
/// Energy may go negative. When the profile was sitting at the cap the regen
/// checkpoint moves to `now`, since no regeneration was owed for that time.
///
/// # Errors
/// [`CoreError::Conflict`] if the task is already completed,
/// [`CoreError::NotFound`] if it belongs to another user.
pub fn complete_task(
    profile: &mut Profile,
    task: &mut ScheduledTask,
    now: DateTime<Utc>,
) -> Result<TaskCompletion> {
    if task.user_id != profile.id {
        return Err(CoreError::not_found("task", task.id.clone()));
    }
    if task.is_completed {
        return Err(CoreError::Conflict(format!("task {} is already completed", task.id)));
    }

    if profile.is_energy_full() {
        profile.last_energy_regen_at = now;
    }

    let previous_level = profile.level;
    let xp_gained = xp_for_task(task);
    profile.energy = profile.energy.saturating_sub(task.energy_cost);
    profile.xp += xp_gained;
    profile.level = level_for_xp(profile.xp);
    profile.tasks_completed_today += 1;
    profile.updated_at = now;
    task.is_completed = true;

    Ok(TaskCompletion {
        energy: profile.energy,
        energy_spent: task.energy_cost,
        xp: profile.xp,
        xp_gained,
        level: profile.level,
        leveled_up: profile.level > previous_level,
        tasks_completed_today: profile.tasks_completed_today,
    })
}

/// Credits handed out by the daily reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardClaim {
    pub energy: i32,
    pub energy_gained: i32,
    pub xp: i64,
    pub xp_gained: i64,
    pub level: i32,
}

/// Claim the reward for finishing today's challenge.
///
/// # Errors
/// [`CoreError::Conflict`] if already claimed today or the challenge target
/// has not been reached.
pub fn claim_daily_reward(profile: &mut Profile, now: DateTime<Utc>) -> Result<RewardClaim> {
    if profile.claimed_on(now) {
        return Err(CoreError::Conflict("daily reward already claimed today".into()));
    }
    if profile.tasks_completed_today < profile.daily_challenge_target {
        return Err(CoreError::Conflict(format!(
            "daily challenge incomplete: {}/{} tasks",
            profile.tasks_completed_today, profile.daily_challenge_target
        )));
    }

    let before = profile.energy;
    if before < MAX_ENERGY {
        profile.energy = (before + DAILY_REWARD_ENERGY).min(MAX_ENERGY);
    }
    profile.xp += DAILY_REWARD_XP;
    profile.level = level_for_xp(profile.xp);
    profile.last_daily_reward_claim = Some(now);
    profile.updated_at = now;

    Ok(RewardClaim {
        energy: profile.energy,
        energy_gained: profile.energy - before,
        xp: profile.xp,
        xp_gained: DAILY_REWARD_XP,
        level: profile.level,
    })
}
