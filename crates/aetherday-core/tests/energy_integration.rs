//! Integration tests for energy regeneration, pods and progression.

use aetherday_core::service::{
    claim_daily_reward, complete_task, create_task, refresh_daily_challenge, regen_user,
    run_regen_batch, settle_pod_exit,
};
use aetherday_core::storage::database::update_profile_cas;
use aetherday_core::{CoreError, Database, EnergyRates, NewScheduledTask, MAX_ENERGY};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn task(name: &str, start: DateTime<Utc>, minutes: i64, cost: i32) -> NewScheduledTask {
    NewScheduledTask {
        name: name.into(),
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        energy_cost: cost,
        is_critical: false,
        is_flexible: true,
        is_locked: false,
    }
}

#[test]
fn test_spend_then_recover_over_a_day() {
    let db = Database::open_memory().unwrap();
    let rates = EnergyRates::default();
    let morning = noon() - Duration::hours(3);

    // 09:00 - a 60 point task drains a fresh profile.
    let heavy = create_task(&db, "u-1", task("Quarterly report", morning, 90, 60), morning).unwrap();
    let (profile, _) = complete_task(&db, "u-1", &heavy.id, morning).unwrap();
    assert_eq!(profile.energy, 40);
    assert_eq!(profile.last_energy_regen_at, morning);

    // 11:00-12:00 break on the schedule.
    create_task(&db, "u-1", task("break", noon() - Duration::hours(1), 60, 0), morning).unwrap();

    // Three hours of passive regen plus one hour of break boost:
    // 180 * 0.1 + 60 * 0.4 = 42.
    let profile = regen_user(&db, "u-1", noon(), &rates).unwrap();
    assert_eq!(profile.energy, 82);

    // A 30 minute pod tops it off without overshooting.
    let (profile, settlement) =
        settle_pod_exit(&db, "u-1", noon(), noon() + Duration::minutes(30), noon(), &rates).unwrap();
    assert_eq!(profile.energy, MAX_ENERGY);
    assert_eq!(settlement.gained, 18);

    // Full profiles are left alone by the batch.
    let report = run_regen_batch(&db, noon() + Duration::hours(1), &rates).unwrap();
    assert_eq!(report.scanned, 0);
}

#[test]
fn test_batch_only_touches_profiles_below_cap() {
    let db = Database::open_memory().unwrap();
    let rates = EnergyRates::default();
    let since = noon() - Duration::minutes(30);

    for (user, energy) in [("a", 100), ("b", 50), ("c", -20)] {
        let mut profile = db.ensure_profile(user, since).unwrap();
        profile.energy = energy;
        assert!(update_profile_cas(db.conn(), &profile).unwrap());
    }

    let report = run_regen_batch(&db, noon(), &rates).unwrap();
    assert_eq!(report.scanned, 2);
    assert_eq!(db.profile("a").unwrap().energy, 100);
    assert_eq!(db.profile("b").unwrap().energy, 53);
    assert_eq!(db.profile("c").unwrap().energy, -17);
}

#[test]
fn test_night_regen_outside_configured_window() {
    let db = Database::open_memory().unwrap();
    let rates = EnergyRates::default();
    let late = Utc.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap();

    let mut profile = db.ensure_profile("owl", late).unwrap();
    profile.energy = 0;
    assert!(update_profile_cas(db.conn(), &profile).unwrap());
    db.set_workday_window("owl", Some("09:00"), Some("17:00"), late).unwrap();

    // 60 minutes at 0.1 + 0.15.
    let profile = regen_user(&db, "owl", late + Duration::hours(1), &rates).unwrap();
    assert_eq!(profile.energy, 15);
}

#[test]
fn test_daily_challenge_cycle_across_days() {
    let db = Database::open_memory().unwrap();
    let day_two = noon() + Duration::days(1);

    refresh_daily_challenge(&db, "u-1", noon()).unwrap();
    for i in 0..3 {
        let start = noon() + Duration::minutes(30 * i);
        let t = create_task(&db, "u-1", task("Focus", start, 25, 5), noon()).unwrap();
        complete_task(&db, "u-1", &t.id, start).unwrap();
    }
    claim_daily_reward(&db, "u-1", noon() + Duration::hours(2)).unwrap();

    // Same day: claimed, so a second claim conflicts.
    let err = claim_daily_reward(&db, "u-1", noon() + Duration::hours(3)).unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));

    // Next day: the counter resets and the reward is available again once earned.
    let (profile, refresh) = refresh_daily_challenge(&db, "u-1", day_two).unwrap();
    assert!(refresh.reset);
    assert_eq!(profile.tasks_completed_today, 0);
    assert_eq!(profile.daily_challenge_target, 3);
}
