//! Regeneration batch, per-user regen and pod settlement.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::update_profile;
use crate::energy::{regenerate, settle_pod, EnergyRates, PodSettlement, RegenOutcome, MAX_ENERGY};
use crate::error::{Result, ValidationError};
use crate::profile::Profile;
use crate::storage::database::{list_profiles_below, list_tasks_overlapping, update_profile_cas};
use crate::storage::Database;

/// One profile the batch moved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenUpdate {
    pub user_id: String,
    pub energy_before: i32,
    pub energy_after: i32,
}

/// Summary of one regeneration batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenReport {
    /// Profiles below the cap that were examined.
    pub scanned: usize,
    pub updated: Vec<RegenUpdate>,
    /// Users whose profile changed between read and write; left for the next run.
    pub conflicts: Vec<String>,
}

fn regen_candidate(db: &Database, profile: &Profile, now: DateTime<Utc>, rates: &EnergyRates) -> Result<Option<Profile>> {
    let tasks = list_tasks_overlapping(db.conn(), &profile.id, profile.last_energy_regen_at, now)?;
    match regenerate(profile, &tasks, now, rates) {
        RegenOutcome::Unchanged => Ok(None),
        RegenOutcome::Updated {
            energy,
            regenerated_at,
            ..
        } => {
            let mut next = profile.clone();
            next.energy = energy;
            next.last_energy_regen_at = regenerated_at;
            next.updated_at = now;
            Ok(Some(next))
        }
    }
}

/// Regenerate every profile below the cap.
///
/// All writes land in one transaction. A profile whose version moved since
/// it was read is skipped and reported in `conflicts`; its checkpoint is
/// untouched so the next run picks it up.
pub fn run_regen_batch(db: &Database, now: DateTime<Utc>, rates: &EnergyRates) -> Result<RegenReport> {
    let profiles = list_profiles_below(db.conn(), MAX_ENERGY)?;
    let mut pending = Vec::new();
    for profile in &profiles {
        if let Some(next) = regen_candidate(db, profile, now, rates)? {
            pending.push((profile.energy, next));
        }
    }

    let mut report = RegenReport {
        scanned: profiles.len(),
        ..RegenReport::default()
    };
    db.with_transaction(|tx| {
        for (before, next) in &pending {
            if update_profile_cas(tx, next)? {
                debug!(user_id = %next.id, before, after = next.energy, "energy regenerated");
                report.updated.push(RegenUpdate {
                    user_id: next.id.clone(),
                    energy_before: *before,
                    energy_after: next.energy,
                });
            } else {
                warn!(user_id = %next.id, "profile changed during regen batch, skipping");
                report.conflicts.push(next.id.clone());
            }
        }
        Ok(())
    })?;

    info!(
        scanned = report.scanned,
        updated = report.updated.len(),
        conflicts = report.conflicts.len(),
        "regen batch finished"
    );
    Ok(report)
}

/// Regenerate one user's energy up to `now`.
pub fn regen_user(db: &Database, user_id: &str, now: DateTime<Utc>, rates: &EnergyRates) -> Result<Profile> {
    let (profile, ()) = update_profile(db, user_id, now, |profile| {
        if let Some(next) = regen_candidate(db, profile, now, rates)? {
            *profile = next;
        }
        Ok(())
    })?;
    Ok(profile)
}

/// Credit a finished Regen Pod session.
///
/// The time range is checked before anything is read or written.
pub fn settle_pod_exit(
    db: &Database,
    user_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
    rates: &EnergyRates,
) -> Result<(Profile, PodSettlement)> {
    if end <= start {
        return Err(ValidationError::InvalidTimeRange { start, end }.into());
    }

    let (profile, settlement) = update_profile(db, user_id, now, |profile| {
        let settlement = settle_pod(profile.energy, start, end, rates)?;
        if settlement.gained != 0 {
            profile.energy = settlement.energy;
            profile.updated_at = now;
        }
        Ok(settlement)
    })?;

    info!(
        user_id,
        gained = settlement.gained,
        minutes = settlement.duration_minutes,
        "pod session settled"
    );
    Ok((profile, settlement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::NewScheduledTask;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn drained(db: &Database, user: &str, energy: i32, since: DateTime<Utc>) {
        let mut profile = db.ensure_profile(user, since).unwrap();
        profile.energy = energy;
        profile.last_energy_regen_at = since;
        assert!(update_profile_cas(db.conn(), &profile).unwrap());
    }

    #[test]
    fn batch_skips_full_profiles_and_updates_the_rest() {
        let db = Database::open_memory().unwrap();
        db.ensure_profile("full", now()).unwrap();
        drained(&db, "tired", 90, now() - Duration::minutes(60));

        let report = run_regen_batch(&db, now(), &EnergyRates::default()).unwrap();
        assert_eq!(report.scanned, 1);
        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.updated[0].energy_after, 96);
        assert!(report.conflicts.is_empty());

        let stored = db.profile("tired").unwrap();
        assert_eq!(stored.energy, 96);
        assert_eq!(stored.last_energy_regen_at, now());
    }

    #[test]
    fn batch_counts_break_tasks() {
        let db = Database::open_memory().unwrap();
        drained(&db, "u-1", 40, now() - Duration::minutes(60));
        let task = NewScheduledTask {
            name: "Break".into(),
            start_time: now() - Duration::minutes(60),
            end_time: now(),
            energy_cost: 0,
            is_critical: false,
            is_flexible: true,
            is_locked: false,
        }
        .into_task("u-1", now())
        .unwrap();
        db.add_task(&task).unwrap();

        run_regen_batch(&db, now(), &EnergyRates::default()).unwrap();
        assert_eq!(db.profile("u-1").unwrap().energy, 70);
    }

    #[test]
    fn unchanged_profile_keeps_checkpoint() {
        let db = Database::open_memory().unwrap();
        let since = now() - Duration::minutes(2);
        drained(&db, "u-1", 50, since);

        let report = run_regen_batch(&db, now(), &EnergyRates::default()).unwrap();
        assert!(report.updated.is_empty());
        assert_eq!(db.profile("u-1").unwrap().last_energy_regen_at, since);
    }

    #[test]
    fn pod_with_reversed_range_writes_nothing() {
        let db = Database::open_memory().unwrap();
        drained(&db, "u-1", 20, now());
        let err = settle_pod_exit(&db, "u-1", now(), now(), now(), &EnergyRates::default()).unwrap_err();
        assert!(matches!(err, crate::error::CoreError::Validation(_)));
        let stored = db.profile("u-1").unwrap();
        assert_eq!(stored.energy, 20);
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn pod_credits_and_clamps() {
        let db = Database::open_memory().unwrap();
        drained(&db, "u-1", 90, now());
        let (profile, settlement) = settle_pod_exit(
            &db,
            "u-1",
            now() - Duration::minutes(30),
            now(),
            now(),
            &EnergyRates::default(),
        )
        .unwrap();
        assert_eq!(profile.energy, MAX_ENERGY);
        assert_eq!(settlement.gained, 10);
    }

    #[test]
    fn regen_user_moves_checkpoint() {
        let db = Database::open_memory().unwrap();
        drained(&db, "u-1", 90, now() - Duration::minutes(60));
        let profile = regen_user(&db, "u-1", now(), &EnergyRates::default()).unwrap();
        assert_eq!(profile.energy, 96);
        assert_eq!(profile.last_energy_regen_at, now());
    }
}
