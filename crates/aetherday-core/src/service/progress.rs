//! Task creation and completion, daily challenge and reward.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{update_profile, MAX_CAS_ATTEMPTS};
use crate::error::{CoreError, Result};
use crate::profile::Profile;
use crate::progression::{self, ChallengeRefresh, RewardClaim, TaskCompletion};
use crate::schedule::{NewScheduledTask, ScheduledTask};
use crate::storage::database::{get_profile, get_task, mark_task_completed, update_profile_cas};
use crate::storage::Database;

pub fn create_task(
    db: &Database,
    user_id: &str,
    input: NewScheduledTask,
    now: DateTime<Utc>,
) -> Result<ScheduledTask> {
    let task = input.into_task(user_id, now)?;
    db.ensure_profile(user_id, now)?;
    db.add_task(&task)?;
    info!(user_id, task_id = %task.id, name = %task.name, "task created");
    Ok(task)
}

/// Complete a task: mark it done and settle energy and XP in one transaction.
pub fn complete_task(
    db: &Database,
    user_id: &str,
    task_id: &str,
    now: DateTime<Utc>,
) -> Result<(Profile, TaskCompletion)> {
    db.ensure_profile(user_id, now)?;

    for attempt in 1..=MAX_CAS_ATTEMPTS {
        let outcome = db.with_transaction(|tx| {
            let mut task = get_task(tx, task_id)?
                .filter(|t| t.user_id == user_id)
                .ok_or_else(|| CoreError::not_found("task", task_id))?;
            let mut profile =
                get_profile(tx, user_id)?.ok_or_else(|| CoreError::not_found("profile", user_id))?;

            let completion = progression::complete_task(&mut profile, &mut task, now)?;
            if !mark_task_completed(tx, task_id)? {
                return Err(CoreError::Conflict(format!("task {task_id} is already completed")));
            }
            if !update_profile_cas(tx, &profile)? {
                // Rolls back the completion flag too.
                return Ok(None);
            }
            profile.version += 1;
            Ok(Some((profile, completion)))
        })?;

        if let Some((profile, completion)) = outcome {
            info!(
                user_id,
                task_id,
                energy = completion.energy,
                xp_gained = completion.xp_gained,
                "task completed"
            );
            return Ok((profile, completion));
        }
        warn!(user_id, task_id, attempt, "profile changed concurrently, retrying completion");
    }

    Err(CoreError::Conflict(format!(
        "profile {user_id} kept changing; gave up after {MAX_CAS_ATTEMPTS} attempts"
    )))
}

pub fn refresh_daily_challenge(db: &Database, user_id: &str, now: DateTime<Utc>) -> Result<(Profile, ChallengeRefresh)> {
    let (profile, refresh) = update_profile(db, user_id, now, |profile| {
        Ok(progression::refresh_daily_challenge(profile, now))
    })?;
    if refresh.reset {
        info!(user_id, target = refresh.target, "daily challenge reset");
    }
    Ok((profile, refresh))
}

pub fn claim_daily_reward(db: &Database, user_id: &str, now: DateTime<Utc>) -> Result<(Profile, RewardClaim)> {
    let (profile, claim) = update_profile(db, user_id, now, |profile| {
        progression::claim_daily_reward(profile, now)
    })?;
    info!(user_id, xp = claim.xp, energy = claim.energy, "daily reward claimed");
    Ok((profile, claim))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::MAX_ENERGY;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn input(cost: i32) -> NewScheduledTask {
        NewScheduledTask {
            name: "Deep work".into(),
            start_time: now(),
            end_time: now() + Duration::minutes(45),
            energy_cost: cost,
            is_critical: false,
            is_flexible: true,
            is_locked: false,
        }
    }

    #[test]
    fn completion_persists_task_and_profile() {
        let db = Database::open_memory().unwrap();
        let task = create_task(&db, "u-1", input(15), now()).unwrap();
        let (profile, completion) = complete_task(&db, "u-1", &task.id, now()).unwrap();

        assert_eq!(completion.energy, MAX_ENERGY - 15);
        assert_eq!(db.profile("u-1").unwrap(), profile);
        assert!(db.task(&task.id).unwrap().is_completed);
    }

    #[test]
    fn second_completion_conflicts_without_double_debit() {
        let db = Database::open_memory().unwrap();
        let task = create_task(&db, "u-1", input(15), now()).unwrap();
        complete_task(&db, "u-1", &task.id, now()).unwrap();

        let err = complete_task(&db, "u-1", &task.id, now()).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(db.profile("u-1").unwrap().energy, MAX_ENERGY - 15);
    }

    #[test]
    fn other_users_task_is_not_found() {
        let db = Database::open_memory().unwrap();
        let task = create_task(&db, "owner", input(15), now()).unwrap();
        let err = complete_task(&db, "intruder", &task.id, now()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(!db.task(&task.id).unwrap().is_completed);
    }

    #[test]
    fn invalid_task_input_is_rejected() {
        let db = Database::open_memory().unwrap();
        let mut bad = input(5);
        bad.end_time = bad.start_time;
        assert!(matches!(
            create_task(&db, "u-1", bad, now()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn challenge_then_reward() {
        let db = Database::open_memory().unwrap();
        let (_, refresh) = refresh_daily_challenge(&db, "u-1", now()).unwrap();
        assert!(refresh.reset);
        assert_eq!(refresh.target, 3);

        assert!(claim_daily_reward(&db, "u-1", now()).is_err());
        for _ in 0..3 {
            let task = create_task(&db, "u-1", input(10), now()).unwrap();
            complete_task(&db, "u-1", &task.id, now()).unwrap();
        }
        let (profile, claim) = claim_daily_reward(&db, "u-1", now()).unwrap();
        assert_eq!(claim.energy_gained, 25);
        assert_eq!(profile.last_daily_reward_claim, Some(now()));

        // Claimed today: refresh is a no-op and the counter survives.
        let (profile, refresh) = refresh_daily_challenge(&db, "u-1", now()).unwrap();
        assert!(!refresh.reset);
        assert_eq!(profile.tasks_completed_today, 3);
    }
}
